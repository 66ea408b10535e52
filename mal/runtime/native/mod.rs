//! Built-in functions implemented in Rust, plus the prelude written in the
//! language itself.
//!
//! Every native checks its arguments and returns an exception instead of
//! panicking.

use std::result;

use crate::{
   Env,
   Value,
   value::{
      Native,
      SString,
   },
};

mod arithmetic;
mod io;
mod map;
mod meta;
mod predicate;
mod sequence;

type Result<T = Value> = result::Result<T, Value>;

const PRELUDE: &str = r#"
(defmacro! cond
  (fn* (& clauses)
    (if (> (count clauses) 0)
      (list 'if (first clauses)
        (if (> (count clauses) 1)
          (nth clauses 1)
          (throw "odd number of forms to cond"))
        (cons 'cond (rest (rest clauses)))))))
"#;

/// Installs every native, `*host-language*`, `*ARGV*` and the prelude into
/// the global frame of the environment.
pub fn register(env: &Env) {
   let env = env.global();

   arithmetic::register(&env);
   io::register(&env);
   map::register(&env);
   meta::register(&env);
   predicate::register(&env);
   sequence::register(&env);

   env.define("*host-language*", Value::from("rust"));

   let argv = Value::list(
      env.config()
         .argv
         .iter()
         .map(|argument| Value::String(SString::from(argument.as_str()))),
   );
   env.define("*ARGV*", argv);

   match crate::rep(PRELUDE, &env) {
      Ok(value) if !value.is_exception() => {},
      Ok(exception) => tracing::error!(%exception, "failed to evaluate prelude"),
      Err(error) => tracing::error!(%error, "failed to read prelude"),
   }
}

fn define(env: &Env, name: &'static str, function: fn(&[Value], &Env) -> Result) {
   env.define(
      name,
      Value::Native(Native::new(name, move |arguments, env| {
         function(arguments, env).unwrap_or_else(|exception| exception)
      })),
   );
}

fn arity(name: &str, arguments: &[Value], expected: usize) -> Result<()> {
   if arguments.len() == expected {
      return Ok(());
   }

   Err(Value::exception(format!(
      "'{name}' expects {expected} argument{s}, got {count}",
      s = if expected == 1 { "" } else { "s" },
      count = arguments.len(),
   )))
}

fn at_least(name: &str, arguments: &[Value], minimum: usize) -> Result<()> {
   if arguments.len() >= minimum {
      return Ok(());
   }

   Err(Value::exception(format!(
      "'{name}' expects at least {minimum} argument{s}, got {count}",
      s = if minimum == 1 { "" } else { "s" },
      count = arguments.len(),
   )))
}

fn type_error(name: &str, expected: &str, got: &Value) -> Value {
   Value::exception(format!(
      "'{name}' expects {expected}, got {type_name}",
      type_name = got.type_name(),
   ))
}

fn number(name: &str, value: &Value) -> Result<i64> {
   match *value {
      Value::Number(number) => Ok(number),
      ref other => Err(type_error(name, "a number", other)),
   }
}

fn string<'a>(name: &str, value: &'a Value) -> Result<&'a SString> {
   match *value {
      Value::String(ref string) => Ok(string),
      ref other => Err(type_error(name, "a string", other)),
   }
}

/// Returns the items of a list or vector. `nil` counts as empty.
fn items<'a>(name: &str, value: &'a Value) -> Result<Vec<&'a Value>> {
   match *value {
      Value::Nil => Ok(Vec::new()),
      ref other => {
         other
            .sequence()
            .map(Iterator::collect)
            .ok_or_else(|| type_error(name, "a list or vector", other))
      },
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::{
      Config,
      environment,
      rep,
   };

   #[test]
   fn globals() {
      let env = environment(
         Config::builder()
            .argv(vec!["one".to_owned(), "two".to_owned()])
            .build(),
      );

      assert_eq!(rep("*host-language*", &env).unwrap(), Value::from("rust"));
      assert_eq!(rep("*ARGV*", &env).unwrap().to_string(), "(\"one\" \"two\")");
      assert_eq!(rep("(list? *ARGV*)", &env).unwrap(), Value::Boolean(true));
      assert_eq!(rep("(first *ARGV*)", &env).unwrap(), Value::from("one"));
   }

   #[test]
   fn empty_argv_is_empty_list() {
      let env = environment(Config::default());

      assert_eq!(rep("*ARGV*", &env).unwrap(), Value::list([]));
   }

   #[test]
   fn natives_print_their_name() {
      let env = environment(Config::default());

      assert_eq!(rep("+", &env).unwrap().to_string(), "#<native +>");
      assert_eq!(rep("(= + +)", &env).unwrap(), Value::Boolean(true));
   }

   #[test]
   fn register_writes_globals_from_any_frame() {
      let env = Env::new(Config::default()).child();
      register(&env);

      assert!(env.global().lookup(&SString::from("cons")).is_some());
   }

   #[test]
   fn helpers() {
      assert_eq!(
         arity("count", &[], 1),
         Err(Value::exception("'count' expects 1 argument, got 0")),
      );
      assert_eq!(
         at_least("+", &[Value::Number(1)], 2),
         Err(Value::exception("'+' expects at least 2 arguments, got 1")),
      );
      assert_eq!(
         number("+", &Value::Nil),
         Err(Value::exception("'+' expects a number, got nil")),
      );
      assert_eq!(items("first", &Value::Nil).unwrap().len(), 0);
      assert!(items("first", &Value::Number(1)).is_err());
   }
}
