use mal_util::{
   Dupe,
   OptionDupedExt as _,
};

use super::{
   Result,
   arity,
   at_least,
   define,
   type_error,
};
use crate::{
   Env,
   Value,
   value::{
      Key,
      Map,
   },
};

pub(super) fn register(env: &Env) {
   define(env, "hash-map", |arguments, _| assoc_pairs("hash-map", &Map::new(), arguments));
   define(env, "map?", |arguments, _| {
      arity("map?", arguments, 1)?;
      Ok(Value::Boolean(matches!(arguments[0], Value::Map(..))))
   });

   define(env, "assoc", |arguments, _| {
      at_least("assoc", arguments, 1)?;
      assoc_pairs("assoc", map("assoc", &arguments[0])?, &arguments[1..])
   });
   define(env, "dissoc", dissoc);

   define(env, "get", get);
   define(env, "contains?", contains);

   define(env, "keys", |arguments, _| {
      arity("keys", arguments, 1)?;
      let map = map("keys", &arguments[0])?;

      Ok(Value::list(
         map.sorted().into_iter().map(|(key, _)| Value::from(key.dupe())),
      ))
   });
   define(env, "vals", |arguments, _| {
      arity("vals", arguments, 1)?;
      let map = map("vals", &arguments[0])?;

      Ok(Value::list(
         map.sorted().into_iter().map(|(_, value)| value.dupe()),
      ))
   });
}

fn map<'a>(name: &str, value: &'a Value) -> Result<&'a Map> {
   match *value {
      Value::Map(ref map, _) => Ok(map),
      ref other => Err(type_error(name, "a map", other)),
   }
}

fn key(name: &str, value: &Value) -> Result<Key> {
   Key::try_from(value).map_err(|()| type_error(name, "a string or keyword key", value))
}

fn assoc_pairs(name: &str, map: &Map, pairs: &[Value]) -> Result {
   if pairs.len() % 2 != 0 {
      return Err(Value::exception(format!(
         "'{name}' expects keys and values in pairs"
      )));
   }

   let mut map = map.dupe();
   for pair in pairs.chunks_exact(2) {
      map = map.insert(key(name, &pair[0])?, pair[1].dupe());
   }

   Ok(Value::from(map))
}

fn dissoc(arguments: &[Value], _: &Env) -> Result {
   at_least("dissoc", arguments, 1)?;

   let mut map = map("dissoc", &arguments[0])?.dupe();
   for argument in &arguments[1..] {
      map = map.remove(&key("dissoc", argument)?);
   }

   Ok(Value::from(map))
}

fn get(arguments: &[Value], _: &Env) -> Result {
   arity("get", arguments, 2)?;

   if matches!(arguments[0], Value::Nil) {
      return Ok(Value::Nil);
   }

   let map = map("get", &arguments[0])?;

   Ok(Key::try_from(&arguments[1])
      .ok()
      .and_then(|key| map.get(&key).duped())
      .unwrap_or(Value::Nil))
}

fn contains(arguments: &[Value], _: &Env) -> Result {
   arity("contains?", arguments, 2)?;

   let map = map("contains?", &arguments[0])?;

   Ok(Value::Boolean(
      Key::try_from(&arguments[1]).is_ok_and(|key| map.contains(&key)),
   ))
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
   fn construction() {
      assert_eq!(run("(hash-map :b 2 \"a\" 1)"), "{\"a\" 1 :b 2}");
      assert_eq!(run("(hash-map)"), "{}");
      assert_eq!(
         run("(hash-map :a)"),
         "Exception: 'hash-map' expects keys and values in pairs"
      );
      assert_eq!(
         run("(hash-map 1 2)"),
         "Exception: 'hash-map' expects a string or keyword key, got number"
      );
      assert_eq!(run("(map? {})"), "true");
      assert_eq!(run("(map? [])"), "false");
   }

   #[test]
   fn assoc_and_dissoc_do_not_mutate() {
      assert_eq!(
         run("(let* (m {:a 1} n (assoc m :b 2 :a 3) o (dissoc n :a)) [m n o])"),
         "[{:a 1} {:a 3 :b 2} {:b 2}]",
      );
      assert_eq!(run("(dissoc {:a 1} :missing)"), "{:a 1}");
   }

   #[test]
   fn lookups() {
      assert_eq!(run("(get {:a 1} :a)"), "1");
      assert_eq!(run("(get {:a 1} :b)"), "nil");
      assert_eq!(run("(get {:a 1} \"a\")"), "nil");
      assert_eq!(run("(get nil :a)"), "nil");
      assert_eq!(run("(contains? {:a nil} :a)"), "true");
      assert_eq!(run("(contains? {:a nil} :b)"), "false");
      assert_eq!(run("(keys {:b 2 :a 1})"), "(:a :b)");
      assert_eq!(run("(vals {:b 2 :a 1})"), "(1 2)");
      assert_eq!(run("(keys {})"), "()");
   }
}
