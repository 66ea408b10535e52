use mal_util::Dupe;

use super::{
   Result,
   arity,
   define,
   type_error,
};
use crate::{
   Env,
   Value,
};

/// Defines a one argument native returning whether the argument matches.
macro_rules! predicate {
   ($env:expr, $name:literal, $pattern:pat $(if $guard:expr)?) => {
      define($env, $name, |arguments, _| {
         arity($name, arguments, 1)?;
         Ok(Value::Boolean(matches!(arguments[0], $pattern $(if $guard)?)))
      });
   };
}

pub(super) fn register(env: &Env) {
   predicate!(env, "nil?", Value::Nil);
   predicate!(env, "true?", Value::Boolean(true));
   predicate!(env, "false?", Value::Boolean(false));
   predicate!(env, "symbol?", Value::Symbol(_));
   predicate!(env, "keyword?", Value::Keyword(_));
   predicate!(env, "string?", Value::String(_));
   predicate!(env, "number?", Value::Number(_));
   predicate!(env, "atom?", Value::Atom(_));
   predicate!(env, "macro?", Value::Closure(ref closure) if closure.is_macro);

   define(env, "fn?", |arguments, _| {
      arity("fn?", arguments, 1)?;
      Ok(Value::Boolean(match arguments[0] {
         Value::Closure(ref closure) => !closure.is_macro,
         Value::Native(_) => true,
         _ => false,
      }))
   });

   define(env, "not", |arguments, _| {
      arity("not", arguments, 1)?;
      Ok(Value::Boolean(!arguments[0].is_truthy()))
   });

   define(env, "symbol", |arguments, _| {
      arity("symbol", arguments, 1)?;

      match arguments[0] {
         Value::String(ref name) | Value::Symbol(ref name) => Ok(Value::Symbol(name.dupe())),
         ref other => Err(type_error("symbol", "a string", other)),
      }
   });

   define(env, "keyword", |arguments, _| {
      arity("keyword", arguments, 1)?;

      match arguments[0] {
         Value::String(ref name) | Value::Keyword(ref name) => Ok(Value::Keyword(name.dupe())),
         ref other => Err(type_error("keyword", "a string", other)),
      }
   });

   define(env, "deref", |arguments, _| {
      arity("deref", arguments, 1)?;

      match arguments[0] {
         Value::Atom(ref atom) => Ok(atom.get()),
         ref other => Err(type_error("deref", "an atom", other)),
      }
   });
}

#[cfg(test)]
mod tests {
   use crate::{
      Config,
      environment,
      rep,
   };

   fn run(source: &str) -> String {
      rep(source, &environment(Config::default())).unwrap().to_string()
   }

   #[test]
   fn type_predicates() {
      assert_eq!(run("(nil? nil)"), "true");
      assert_eq!(run("(nil? false)"), "false");
      assert_eq!(run("(true? true)"), "true");
      assert_eq!(run("(true? 1)"), "false");
      assert_eq!(run("(false? false)"), "true");
      assert_eq!(run("(symbol? 'a)"), "true");
      assert_eq!(run("(symbol? \"a\")"), "false");
      assert_eq!(run("(keyword? :a)"), "true");
      assert_eq!(run("(string? \"a\")"), "true");
      assert_eq!(run("(string? :a)"), "false");
      assert_eq!(run("(number? 1)"), "true");
      assert_eq!(run("(atom? (atom 1))"), "true");
      assert_eq!(
         run("(nil?)"),
         "Exception: 'nil?' expects 1 argument, got 0"
      );
   }

   #[test]
   fn function_predicates() {
      assert_eq!(run("(fn? +)"), "true");
      assert_eq!(run("(fn? (fn* () 1))"), "true");
      assert_eq!(run("(fn? cond)"), "false");
      assert_eq!(run("(macro? cond)"), "true");
      assert_eq!(run("(macro? +)"), "false");
   }

   #[test]
   fn constructors() {
      assert_eq!(run("(symbol \"abc\")"), "abc");
      assert_eq!(run("(keyword \"abc\")"), ":abc");
      assert_eq!(run("(keyword :abc)"), ":abc");
      assert_eq!(run("(= (symbol \"a\") 'a)"), "true");
   }

   #[test]
   fn not_and_deref() {
      assert_eq!(run("(not nil)"), "true");
      assert_eq!(run("(not 0)"), "false");
      assert_eq!(run("@(atom [1])"), "[1]");
      assert_eq!(
         run("(deref 1)"),
         "Exception: 'deref' expects an atom, got number"
      );
   }
}
