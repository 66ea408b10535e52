use std::rc::Rc;

use mal_util::Dupe;

use super::{
   SpecialForm,
   apply,
};
use crate::{
   Env,
   Value,
   value::Closure,
};

/// Returns the macro a form calls, if its head is a symbol bound to one.
///
/// Special form names never resolve to macros.
pub fn macro_function(ast: &Value, env: &Env) -> Option<Rc<Closure>> {
   let Some(&Value::Symbol(ref name)) = ast.as_list()?.first() else {
      return None;
   };

   if SpecialForm::from_name(name).is_some() {
      return None;
   }

   match env.lookup(name)? {
      Value::Closure(ref closure) if closure.is_macro => Some(closure.dupe()),
      _ => None,
   }
}

/// Expands the form until its head is no longer a macro call.
///
/// Macros receive their arguments unevaluated. An exception raised while
/// expanding stops the expansion and is returned.
pub fn macroexpand(ast: Value, env: &Env) -> Value {
   let mut ast = ast;

   while let Some(closure) = macro_function(&ast, env) {
      let arguments = ast
         .as_list()
         .map(|list| list.iter().skip(1).map(Dupe::dupe).collect::<Vec<_>>())
         .unwrap_or_default();

      tracing::debug!(form = %ast, "expanding macro");

      ast = apply(&Value::Closure(closure), &arguments, env);

      if ast.is_exception() {
         break;
      }
   }

   ast
}
