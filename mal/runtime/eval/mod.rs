//! The evaluator.
//!
//! [`eval`] evaluates a form, [`eval_ast`] evaluates the parts of a form
//! without treating it as a call. Errors are exception values: every place
//! that evaluates more than one sub-form stops at the first exception and
//! returns it.

use std::rc::Rc;

use mal_util::Dupe;

use crate::{
   Env,
   Value,
   value::{
      Closure,
      List,
      Map,
   },
};

mod macros;
pub use macros::{
   macro_function,
   macroexpand,
};

mod quasiquote;
pub use quasiquote::quasiquote;

mod special;
pub use special::SpecialForm;

/// What evaluating one step of a form produced.
enum Step {
   /// The form evaluated to this value.
   Return(Value),
   /// The value of the form is the value of this form in this environment.
   Continue(Value, Env),
}

/// Evaluates the form.
///
/// Forms in tail position of `if`, `do`, `let*`, `try*`, `quasiquote`,
/// macro expansions and closure bodies are evaluated in a loop, so only
/// nested non-tail evaluations count towards the depth limit.
#[stacksafe::stacksafe]
pub fn eval(ast: Value, env: &Env) -> Value {
   let Some(_level) = env.enter() else {
      let max_depth = env.config().max_depth;
      tracing::debug!(max_depth, "evaluation depth exceeded");

      return Value::exception(format!(
         "maximum evaluation depth of {max_depth} exceeded"
      ));
   };

   let mut ast = ast;
   let mut env = env.dupe();

   loop {
      match step(ast, &env) {
         Ok(Step::Continue(next, next_env)) => {
            ast = next;
            env = next_env;
         },

         Ok(Step::Return(value)) | Err(value) => return value,
      }
   }
}

fn step(ast: Value, env: &Env) -> Result<Step, Value> {
   if !matches!(ast, Value::List(ref list, _) if !list.is_empty()) {
      return try_eval_ast(&ast, env).map(Step::Return);
   }

   let ast = macroexpand(ast, env);

   let Value::List(ref list, _) = ast else {
      return try_eval_ast(&ast, env).map(Step::Return);
   };

   if let Some(&Value::Symbol(ref name)) = list.first()
      && let Some(form) = SpecialForm::from_name(name)
   {
      tracing::trace!(%form, "evaluating special form");
      return special::evaluate(form, list, env);
   }

   let evaluated = eval_items(list.iter(), env)?;
   let Some((function, arguments)) = evaluated.split_first() else {
      return Ok(Step::Return(ast.dupe()));
   };

   tracing::trace!(%function, arguments = arguments.len(), "applying");

   match *function {
      Value::Closure(ref closure) => {
         let frame = call_frame(closure, arguments)?;
         Ok(Step::Continue(closure.body.dupe(), frame))
      },

      Value::Native(ref native) => Ok(Step::Return(native.call(arguments, env))),

      ref other => Err(not_callable(other)),
   }
}

/// Evaluates a form without treating it as a call.
///
/// Symbols are looked up, lists, vectors and map values are evaluated item
/// by item, and everything else evaluates to itself. Map values are
/// evaluated in key order.
pub fn eval_ast(ast: &Value, env: &Env) -> Value {
   try_eval_ast(ast, env).unwrap_or_else(|exception| exception)
}

fn try_eval_ast(ast: &Value, env: &Env) -> Result<Value, Value> {
   Ok(match *ast {
      Value::Symbol(ref name) => {
         env.lookup(name)
            .ok_or_else(|| Value::exception(format!("'{name}' not found")))?
      },

      Value::List(ref list, _) => {
         Value::from(eval_items(list.iter(), env)?.into_iter().collect::<List>())
      },

      Value::Vector(ref vector, _) => Value::vector(eval_items(vector.iter(), env)?),

      Value::Map(ref map, _) => {
         let mut evaluated = Map::new();

         for (key, value) in map.sorted() {
            evaluated = evaluated.insert(key.dupe(), try_eval(value.dupe(), env)?);
         }

         Value::from(evaluated)
      },

      ref other => other.dupe(),
   })
}

/// Evaluates the form, moving an exception into the error position.
pub(crate) fn try_eval(ast: Value, env: &Env) -> Result<Value, Value> {
   let value = eval(ast, env);

   if value.is_exception() {
      Err(value)
   } else {
      Ok(value)
   }
}

/// Evaluates every item in order, stopping at the first exception.
pub(crate) fn eval_items<'a>(
   items: impl Iterator<Item = &'a Value>,
   env: &Env,
) -> Result<Vec<Value>, Value> {
   items.map(|item| try_eval(item.dupe(), env)).collect()
}

fn call_frame(closure: &Closure, arguments: &[Value]) -> Result<Env, Value> {
   let frame = closure.env.child();
   frame.bind(&closure.params, arguments)?;
   Ok(frame)
}

fn not_callable(value: &Value) -> Value {
   Value::exception(format!("'{value}' is not callable"))
}

/// Applies a function to already evaluated arguments.
///
/// Closures run in a fresh frame on top of the environment they captured.
/// Natives receive `env` as the calling environment.
pub fn apply(function: &Value, arguments: &[Value], env: &Env) -> Value {
   tracing::trace!(%function, arguments = arguments.len(), "applying");

   match *function {
      Value::Closure(ref closure) => {
         match call_frame(closure, arguments) {
            Ok(frame) => eval(closure.body.dupe(), &frame),
            Err(exception) => exception,
         }
      },

      Value::Native(ref native) => native.call(arguments, env),

      ref other => not_callable(other),
   }
}

/// Wraps a closure as a value.
pub(crate) fn closure(closure: Closure) -> Value {
   Value::Closure(Rc::new(closure))
}
