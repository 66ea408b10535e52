use super::{
   Result,
   at_least,
   define,
   number,
};
use crate::{
   Env,
   Value,
};

pub(super) fn register(env: &Env) {
   define(env, "+", |arguments, _| fold("+", arguments, i64::checked_add));
   define(env, "-", |arguments, _| fold("-", arguments, i64::checked_sub));
   define(env, "*", |arguments, _| fold("*", arguments, i64::checked_mul));
   define(env, "/", |arguments, _| divide(arguments));

   define(env, "=", |arguments, _| equal(arguments));
   define(env, "<", |arguments, _| compare("<", arguments, |left, right| left < right));
   define(env, "<=", |arguments, _| compare("<=", arguments, |left, right| left <= right));
   define(env, ">", |arguments, _| compare(">", arguments, |left, right| left > right));
   define(env, ">=", |arguments, _| compare(">=", arguments, |left, right| left >= right));
}

fn numbers(name: &str, arguments: &[Value]) -> Result<Vec<i64>> {
   at_least(name, arguments, 2)?;

   arguments
      .iter()
      .map(|argument| number(name, argument))
      .collect()
}

fn overflow() -> Value {
   Value::exception("integer overflow")
}

fn fold(name: &str, arguments: &[Value], operation: fn(i64, i64) -> Option<i64>) -> Result {
   let numbers = numbers(name, arguments)?;
   let (&first, rest) = numbers.split_first().ok_or_else(overflow)?;

   rest
      .iter()
      .try_fold(first, |accumulator, &number| operation(accumulator, number).ok_or_else(overflow))
      .map(Value::Number)
}

fn divide(arguments: &[Value]) -> Result {
   let numbers = numbers("/", arguments)?;
   let (&first, rest) = numbers.split_first().ok_or_else(overflow)?;

   rest
      .iter()
      .try_fold(first, |accumulator, &divisor| {
         if divisor == 0 {
            return Err(Value::exception("division by zero"));
         }

         accumulator.checked_div(divisor).ok_or_else(overflow)
      })
      .map(Value::Number)
}

fn compare(name: &str, arguments: &[Value], predicate: fn(i64, i64) -> bool) -> Result {
   let numbers = numbers(name, arguments)?;

   Ok(Value::Boolean(
      numbers.windows(2).all(|pair| predicate(pair[0], pair[1])),
   ))
}

fn equal(arguments: &[Value]) -> Result {
   at_least("=", arguments, 2)?;

   Ok(Value::Boolean(
      arguments.windows(2).all(|pair| pair[0] == pair[1]),
   ))
}

#[cfg(test)]
mod tests {
   use crate::{
      Config,
      Value,
      environment,
      rep,
   };

   fn run(source: &str) -> Value {
      rep(source, &environment(Config::default())).unwrap()
   }

   #[test]
   fn arithmetic() {
      assert_eq!(run("(+ 1 2)"), Value::Number(3));
      assert_eq!(run("(- 1 2)"), Value::Number(-1));
      assert_eq!(run("(* -3 4)"), Value::Number(-12));
      assert_eq!(run("(/ -7 2)"), Value::Number(-3));
      assert_eq!(run("(/ 100 5 2)"), Value::Number(10));
   }

   #[test]
   fn errors() {
      assert_eq!(
         run("(+ 1 :a)"),
         Value::exception("'+' expects a number, got keyword")
      );
      assert_eq!(run("(/ 1 0)"), Value::exception("division by zero"));
      assert_eq!(run("(/ 10 2 0)"), Value::exception("division by zero"));
      assert_eq!(
         run("(+ 9223372036854775807 1)"),
         Value::exception("integer overflow")
      );
      assert_eq!(
         run("(/ -9223372036854775808 -1)"),
         Value::exception("integer overflow")
      );
      assert_eq!(
         run("(-)"),
         Value::exception("'-' expects at least 2 arguments, got 0")
      );
   }

   #[test]
   fn comparisons() {
      assert_eq!(run("(< 1 2 3)"), Value::Boolean(true));
      assert_eq!(run("(< 1 3 2)"), Value::Boolean(false));
      assert_eq!(run("(<= 2 2)"), Value::Boolean(true));
      assert_eq!(run("(> 3 2 1)"), Value::Boolean(true));
      assert_eq!(run("(>= 1 2)"), Value::Boolean(false));
      assert!(run("(< 1 \"2\")").is_exception());
   }

   #[test]
   fn equality() {
      assert_eq!(run("(= 1 1)"), Value::Boolean(true));
      assert_eq!(run("(= (list 1 2) [1 2])"), Value::Boolean(true));
      assert_eq!(run("(= {:a [1]} {:a (list 1)})"), Value::Boolean(true));
      assert_eq!(run("(= \"a\" :a)"), Value::Boolean(false));
      assert_eq!(run("(= nil false)"), Value::Boolean(false));
      assert_eq!(run("(= (atom 1) (atom 1))"), Value::Boolean(false));
      assert_eq!(run("(let* (a (atom 1)) (= a a))"), Value::Boolean(true));
   }
}
