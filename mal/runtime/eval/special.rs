use mal_util::{
   Dupe,
   collect_vec,
   suffix::Rc as _,
};

use super::{
   Step,
   apply,
   closure,
   eval,
   eval_items,
   macroexpand,
   quasiquote,
   try_eval,
};
use crate::{
   Env,
   Value,
   value::{
      Atom,
      Closure,
      List,
      Meta,
      Params,
      SString,
   },
};

/// A form with its own evaluation rule. The names are reserved: binding one
/// of them does not change how the form evaluates.
#[derive(derive_more::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialForm {
   #[display("def!")]
   Def,
   #[display("let*")]
   Let,
   #[display("if")]
   If,
   #[display("do")]
   Do,
   #[display("fn*")]
   Fn,
   #[display("atom")]
   Atom,
   #[display("reset!")]
   Reset,
   #[display("swap!")]
   Swap,
   #[display("quote")]
   Quote,
   #[display("quasiquote")]
   Quasiquote,
   #[display("quasiquoteexpand")]
   QuasiquoteExpand,
   #[display("defmacro!")]
   DefMacro,
   #[display("macroexpand")]
   MacroExpand,
   #[display("try*")]
   Try,
}

static SPECIAL_FORMS: phf::Map<&'static str, SpecialForm> = phf::phf_map! {
   "def!" => SpecialForm::Def,
   "let*" => SpecialForm::Let,
   "if" => SpecialForm::If,
   "do" => SpecialForm::Do,
   "fn*" => SpecialForm::Fn,
   "atom" => SpecialForm::Atom,
   "reset!" => SpecialForm::Reset,
   "swap!" => SpecialForm::Swap,
   "quote" => SpecialForm::Quote,
   "quasiquote" => SpecialForm::Quasiquote,
   "quasiquoteexpand" => SpecialForm::QuasiquoteExpand,
   "defmacro!" => SpecialForm::DefMacro,
   "macroexpand" => SpecialForm::MacroExpand,
   "try*" => SpecialForm::Try,
};

impl SpecialForm {
   #[must_use]
   pub fn from_name(name: &str) -> Option<Self> {
      SPECIAL_FORMS.get(name).copied()
   }

   fn too_few(self, arguments: &[&Value], minimum: usize) -> Value {
      Value::exception(format!(
         "'{self}' expects at least {minimum} argument{s}, got {count}",
         s = if minimum == 1 { "" } else { "s" },
         count = arguments.len(),
      ))
   }

   fn expect_at_least(self, arguments: &[&Value], minimum: usize) -> Result<(), Value> {
      if arguments.len() >= minimum {
         return Ok(());
      }

      Err(self.too_few(arguments, minimum))
   }

   fn expect_symbol<'a>(self, value: &'a Value) -> Result<&'a SString, Value> {
      match *value {
         Value::Symbol(ref name) => Ok(name),

         ref other => {
            Err(Value::exception(format!(
               "'{self}' expects a symbol, got {type_name}",
               type_name = other.type_name(),
            )))
         },
      }
   }

   fn expect_atom(self, value: Value) -> Result<Atom, Value> {
      match value {
         Value::Atom(ref atom) => Ok(atom.dupe()),

         other => {
            Err(Value::exception(format!(
               "'{self}' expects an atom, got {type_name}",
               type_name = other.type_name(),
            )))
         },
      }
   }
}

/// Evaluates a special form. `list` is the whole form, head included.
pub(super) fn evaluate(form: SpecialForm, list: &List, env: &Env) -> Result<Step, Value> {
   let arguments = list.iter().skip(1).collect::<Vec<_>>();

   match form {
      SpecialForm::Def | SpecialForm::DefMacro => {
         form.expect_at_least(&arguments, 2)?;

         let name = form.expect_symbol(arguments[0])?;
         let value = try_eval(arguments[1].dupe(), env)?;

         let value = match value {
            Value::Closure(ref function) if form == SpecialForm::DefMacro => {
               Value::Closure(function.to_macro().rc())
            },

            other if form == SpecialForm::DefMacro => {
               return Err(Value::exception(format!(
                  "'{form}' expects a function, got {type_name}",
                  type_name = other.type_name(),
               )));
            },

            other => other,
         };

         env.define(name.dupe(), value.dupe());
         Ok(Step::Return(value))
      },

      SpecialForm::Let => {
         form.expect_at_least(&arguments, 2)?;

         let Some(bindings) = arguments[0].sequence() else {
            return Err(Value::exception(format!(
               "'{form}' expects a list or vector of bindings, got {type_name}",
               type_name = arguments[0].type_name(),
            )));
         };
         collect_vec!(bindings);

         if bindings.len() % 2 != 0 {
            return Err(Value::exception(format!(
               "'{form}' bindings must come in name and value pairs"
            )));
         }

         let frame = env.child();
         for pair in bindings.chunks_exact(2) {
            let name = form.expect_symbol(pair[0])?;
            let value = try_eval(pair[1].dupe(), &frame)?;

            frame.define(name.dupe(), value);
         }

         Ok(Step::Continue(arguments[1].dupe(), frame))
      },

      SpecialForm::If => {
         form.expect_at_least(&arguments, 2)?;

         let condition = try_eval(arguments[0].dupe(), env)?;

         if condition.is_truthy() {
            Ok(Step::Continue(arguments[1].dupe(), env.dupe()))
         } else if let Some(&otherwise) = arguments.get(2) {
            Ok(Step::Continue(otherwise.dupe(), env.dupe()))
         } else {
            Ok(Step::Return(Value::Nil))
         }
      },

      SpecialForm::Do => {
         let [ref init @ .., last] = *arguments.as_slice() else {
            return Err(form.too_few(&arguments, 1));
         };

         eval_items(init.iter().copied(), env)?;

         Ok(Step::Continue(last.dupe(), env.dupe()))
      },

      SpecialForm::Fn => {
         form.expect_at_least(&arguments, 2)?;

         Ok(Step::Return(closure(Closure {
            params:   Params::parse(arguments[0])?,
            body:     arguments[1].dupe(),
            env:      env.dupe(),
            is_macro: false,
            meta:     Meta::default(),
         })))
      },

      SpecialForm::Atom => {
         form.expect_at_least(&arguments, 1)?;

         let value = try_eval(arguments[0].dupe(), env)?;

         Ok(Step::Return(Value::Atom(Atom::new(value))))
      },

      SpecialForm::Reset => {
         form.expect_at_least(&arguments, 2)?;

         let atom = form.expect_atom(try_eval(arguments[0].dupe(), env)?)?;
         let value = try_eval(arguments[1].dupe(), env)?;

         atom.set(value.dupe());
         Ok(Step::Return(value))
      },

      SpecialForm::Swap => {
         form.expect_at_least(&arguments, 2)?;

         let atom = form.expect_atom(try_eval(arguments[0].dupe(), env)?)?;
         let function = try_eval(arguments[1].dupe(), env)?;

         let mut call = vec![atom.get()];
         call.extend(eval_items(arguments[2..].iter().copied(), env)?);

         let value = apply(&function, &call, env);
         if value.is_exception() {
            return Err(value);
         }

         atom.set(value.dupe());
         Ok(Step::Return(value))
      },

      SpecialForm::Quote => {
         form.expect_at_least(&arguments, 1)?;

         Ok(Step::Return(arguments[0].dupe()))
      },

      SpecialForm::Quasiquote => {
         form.expect_at_least(&arguments, 1)?;

         Ok(Step::Continue(quasiquote(arguments[0]), env.dupe()))
      },

      SpecialForm::QuasiquoteExpand => {
         form.expect_at_least(&arguments, 1)?;

         Ok(Step::Return(quasiquote(arguments[0])))
      },

      SpecialForm::MacroExpand => {
         form.expect_at_least(&arguments, 1)?;

         Ok(Step::Return(macroexpand(arguments[0].dupe(), env)))
      },

      SpecialForm::Try => {
         let Some(&protected) = arguments.first() else {
            return Ok(Step::Return(Value::Nil));
         };

         let handler = arguments.get(1).map(|&clause| catch_clause(clause)).transpose()?;

         match (eval(protected.dupe(), env), handler) {
            (Value::Exception(ref message), Some((name, body))) => {
               let frame = env.child();
               frame.define(name, Value::String(message.dupe()));

               Ok(Step::Continue(body, frame))
            },

            (value, _) => Ok(Step::Return(value)),
         }
      },
   }
}

/// Destructures `(catch* name handler)`.
fn catch_clause(clause: &Value) -> Result<(SString, Value), Value> {
   let malformed = || Value::exception("'try*' expects a (catch* name handler) clause");

   let items = clause
      .as_list()
      .ok_or_else(malformed)?
      .iter()
      .collect::<Vec<_>>();

   match *items.as_slice() {
      [head, &Value::Symbol(ref name), body] if head.is_symbol("catch*") => {
         Ok((name.dupe(), body.dupe()))
      },

      _ => Err(malformed()),
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn names_round_trip() {
      for (name, form) in SPECIAL_FORMS.entries() {
         assert_eq!(form.to_string(), *name);
         assert_eq!(SpecialForm::from_name(name), Some(*form));
      }

      assert_eq!(SPECIAL_FORMS.len(), 14);
      assert_eq!(SpecialForm::from_name("catch*"), None);
      assert_eq!(SpecialForm::from_name("define"), None);
   }

   #[test]
   fn arity_messages() {
      assert_eq!(
         SpecialForm::Let.expect_at_least(&[], 2),
         Err(Value::exception("'let*' expects at least 2 arguments, got 0")),
      );
      assert_eq!(
         SpecialForm::Quote.expect_at_least(&[], 1),
         Err(Value::exception("'quote' expects at least 1 argument, got 0")),
      );
   }

   #[test]
   fn empty_do_is_an_arity_exception() {
      let env = crate::environment(crate::Config::default());

      assert_eq!(
         crate::rep("(do)", &env).unwrap(),
         Value::exception("'do' expects at least 1 argument, got 0"),
      );
      assert_eq!(crate::rep("(do 1 2 3)", &env).unwrap(), Value::Number(3));
   }
}
