use mal_util::Dupe as _;

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

pub(super) fn register(env: &Env) {
   define(env, "meta", |arguments, _| {
      arity("meta", arguments, 1)?;
      Ok(arguments[0].meta().unwrap_or(Value::Nil))
   });

   define(env, "with-meta", with_meta);
}

fn with_meta(arguments: &[Value], _: &Env) -> Result {
   arity("with-meta", arguments, 2)?;

   arguments[0]
      .with_meta(arguments[1].dupe())
      .ok_or_else(|| type_error("with-meta", "a collection or function", &arguments[0]))
}

#[cfg(test)]
mod tests {
   use crate::{
      Config,
      environment,
      rep,
   };

   fn run(source: &str) -> String {
      let env = environment(Config::default());
      rep(source, &env).unwrap().to_string()
   }

   #[test]
   fn with_meta_returns_a_tagged_copy() {
      assert_eq!(run("(meta (with-meta [1 2] {:a 1}))"), "{:a 1}");
      assert_eq!(run("(do (def! v [1]) (with-meta v :tag) (meta v))"), "nil");
      assert_eq!(run("(= (with-meta (list 1) :tag) (list 1))"), "true");
   }

   #[test]
   fn functions_carry_metadata() {
      assert_eq!(run("(meta (with-meta (fn* (x) x) \"doc\"))"), "\"doc\"");
      assert_eq!(run("((with-meta (fn* (x) (* 2 x)) nil) 21)"), "42");
      assert_eq!(run("(meta (with-meta + :plus))"), ":plus");
      assert_eq!(run("(= (with-meta + :plus) +)"), "true");
   }

   #[test]
   fn reader_caret_attaches_metadata() {
      assert_eq!(run("(meta ^{:a 1} [1])"), "{:a 1}");
   }

   #[test]
   fn values_without_metadata() {
      assert_eq!(run("(meta 1)"), "nil");
      assert_eq!(
         run("(with-meta 1 :tag)"),
         "Exception: 'with-meta' expects a collection or function, got number",
      );
   }
}
