//! Runtime implementation: values, environments, the reader and the
//! evaluator.

mod env;
pub use env::{
   Env,
   State,
};

pub mod eval;
pub use eval::{
   apply,
   eval,
   eval_ast,
};

pub mod native;

pub mod reader;
pub use reader::{
   ReadError,
   read,
   read_all,
};

pub mod value;
pub use value::Value;

/// The default limit of nested non-tail evaluations.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Interpreter configuration.
#[derive(bon::Builder, Debug, Clone, PartialEq, Eq)]
pub struct Config {
   /// The maximum number of nested evaluations before an exception is
   /// returned.
   #[builder(default = DEFAULT_MAX_DEPTH)]
   pub max_depth: usize,

   /// The arguments bound to `*ARGV*`.
   #[builder(default)]
   pub argv: Vec<String>,
}

impl Default for Config {
   fn default() -> Self {
      Self::builder().build()
   }
}

/// Creates a global environment with every native built-in and the prelude
/// installed.
#[must_use]
pub fn environment(config: Config) -> Env {
   let env = Env::new(config);
   native::register(&env);
   env
}

/// Reads and evaluates every form in the source, returning the value of the
/// last one.
///
/// Evaluation stops at the first exception, which is returned as the value.
/// Empty source evaluates to nil.
pub fn rep(source: &str, env: &Env) -> Result<Value, ReadError> {
   let forms = read_all(source)?;

   let mut last = Value::Nil;
   for form in forms {
      last = eval(form, env);

      if last.is_exception() {
         break;
      }
   }

   Ok(last)
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn config_defaults() {
      let config = Config::default();

      assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
      assert!(config.argv.is_empty());
   }

   #[test]
   fn rep_stops_at_first_exception() {
      let env = environment(Config::default());

      let value = rep("(def! x 1) (throw \"stop\") (def! x 2)", &env).unwrap();

      assert_eq!(value, Value::exception("stop"));
      assert_eq!(rep("x", &env).unwrap(), Value::Number(1));
   }

   #[test]
   fn rep_of_nothing_is_nil() {
      let env = environment(Config::default());

      assert_eq!(rep("  ; only a comment", &env).unwrap(), Value::Nil);
   }
}
