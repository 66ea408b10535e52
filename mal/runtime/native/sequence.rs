use mal_util::Dupe;

use super::{
   Result,
   arity,
   at_least,
   define,
   items,
   number,
   type_error,
};
use crate::{
   Env,
   Value,
   eval,
   value::Vector,
};

pub(super) fn register(env: &Env) {
   define(env, "list", |arguments, _| Ok(Value::list(arguments.iter().map(Dupe::dupe))));
   define(env, "list?", |arguments, _| {
      arity("list?", arguments, 1)?;
      Ok(Value::Boolean(matches!(arguments[0], Value::List(..))))
   });

   define(env, "vector", |arguments, _| {
      Ok(Value::vector(arguments.iter().map(Dupe::dupe)))
   });
   define(env, "vector?", |arguments, _| {
      arity("vector?", arguments, 1)?;
      Ok(Value::Boolean(matches!(arguments[0], Value::Vector(..))))
   });
   define(env, "vec", to_vector);

   define(env, "sequential?", |arguments, _| {
      arity("sequential?", arguments, 1)?;
      Ok(Value::Boolean(arguments[0].sequence().is_some()))
   });

   define(env, "cons", cons);
   define(env, "concat", concat);
   define(env, "nth", nth);
   define(env, "first", first);
   define(env, "rest", rest);

   define(env, "empty?", |arguments, _| {
      arity("empty?", arguments, 1)?;
      Ok(Value::Boolean(items("empty?", &arguments[0])?.is_empty()))
   });
   define(env, "count", count);

   define(env, "apply", apply);
   define(env, "map", map);
}

fn to_vector(arguments: &[Value], _: &Env) -> Result {
   arity("vec", arguments, 1)?;

   match arguments[0] {
      Value::Vector(ref vector, _) => Ok(Value::from(vector.dupe())),
      ref other => {
         Ok(Value::from(
            items("vec", other)?.into_iter().map(Dupe::dupe).collect::<Vector>(),
         ))
      },
   }
}

fn cons(arguments: &[Value], _: &Env) -> Result {
   arity("cons", arguments, 2)?;

   let head = arguments[0].dupe();

   match arguments[1] {
      // Shares the tail with the argument.
      Value::List(ref list, _) => Ok(Value::from(list.push_front(head))),
      ref other => {
         let tail = items("cons", other)?;
         Ok(Value::list([head].into_iter().chain(tail.into_iter().map(Dupe::dupe))))
      },
   }
}

fn concat(arguments: &[Value], _: &Env) -> Result {
   let mut concatenated = Vec::new();

   for argument in arguments {
      concatenated.extend(items("concat", argument)?.into_iter().map(Dupe::dupe));
   }

   Ok(Value::list(concatenated))
}

fn nth(arguments: &[Value], _: &Env) -> Result {
   arity("nth", arguments, 2)?;

   let items = items("nth", &arguments[0])?;
   let index = number("nth", &arguments[1])?;

   usize::try_from(index)
      .ok()
      .and_then(|index| items.get(index))
      .map(|&item| item.dupe())
      .ok_or_else(|| {
         Value::exception(format!(
            "index {index} out of range for sequence of length {length}",
            length = items.len(),
         ))
      })
}

fn first(arguments: &[Value], _: &Env) -> Result {
   arity("first", arguments, 1)?;

   Ok(items("first", &arguments[0])?
      .first()
      .map_or(Value::Nil, |&item| item.dupe()))
}

fn rest(arguments: &[Value], _: &Env) -> Result {
   arity("rest", arguments, 1)?;

   match arguments[0] {
      // Shares structure and leaves the argument intact.
      Value::List(ref list, _) => Ok(Value::from(list.drop_first().unwrap_or_else(rpds::List::new))),
      ref other => {
         Ok(Value::list(
            items("rest", other)?.into_iter().skip(1).map(Dupe::dupe),
         ))
      },
   }
}

fn count(arguments: &[Value], _: &Env) -> Result {
   arity("count", arguments, 1)?;

   let count = match arguments[0] {
      Value::Map(ref map, _) => map.len(),
      ref other => items("count", other)?.len(),
   };

   i64::try_from(count)
      .map(Value::Number)
      .map_err(|_| Value::exception("integer overflow"))
}

fn apply(arguments: &[Value], env: &Env) -> Result {
   at_least("apply", arguments, 2)?;

   let (function, rest) = arguments.split_first().ok_or(Value::Nil)?;
   let (last, middle) = rest.split_last().ok_or(Value::Nil)?;

   let mut call = middle.to_vec();
   call.extend(items("apply", last)?.into_iter().map(Dupe::dupe));

   let value = eval::apply(function, &call, env);
   if value.is_exception() {
      return Err(value);
   }

   Ok(value)
}

fn map(arguments: &[Value], env: &Env) -> Result {
   arity("map", arguments, 2)?;

   let function = &arguments[0];
   if !matches!(*function, Value::Closure(_) | Value::Native(_)) {
      return Err(type_error("map", "a function", function));
   }

   let mut mapped = Vec::new();
   for item in items("map", &arguments[1])? {
      let value = eval::apply(function, &[item.dupe()], env);

      if value.is_exception() {
         return Err(value);
      }

      mapped.push(value);
   }

   Ok(Value::list(mapped))
}
