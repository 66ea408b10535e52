use std::{
   fmt::Write as _,
   fs,
   io::{
      self,
      BufRead as _,
      Write as _,
   },
};

use mal_util::Dupe as _;

use super::{
   Result,
   arity,
   define,
   string,
};
use crate::{
   Env,
   Value,
   eval,
   read,
   read_all,
};

pub(super) fn register(env: &Env) {
   define(env, "pr-str", |arguments, _| Ok(Value::from(join(arguments, true, " ").as_str())));
   define(env, "str", |arguments, _| Ok(Value::from(join(arguments, false, "").as_str())));

   define(env, "prn", |arguments, _| print_line(&join(arguments, true, " ")));
   define(env, "println", |arguments, _| print_line(&join(arguments, false, " ")));

   define(env, "readline", readline);

   define(env, "read-string", |arguments, _| {
      arity("read-string", arguments, 1)?;

      match read(string("read-string", &arguments[0])?) {
         Ok(value) => Ok(value.unwrap_or(Value::Nil)),
         Err(error) => Err(Value::exception(error.to_string())),
      }
   });

   define(env, "eval", |arguments, env| {
      arity("eval", arguments, 1)?;

      Ok(eval(arguments[0].dupe(), &env.global()))
   });

   define(env, "slurp", |arguments, _| {
      arity("slurp", arguments, 1)?;

      slurp(string("slurp", &arguments[0])?).map(|content| Value::from(content.as_str()))
   });

   define(env, "load-file", load_file);

   define(env, "throw", |arguments, _| {
      arity("throw", arguments, 1)?;

      Err(match arguments[0] {
         Value::String(ref message) => Value::Exception(message.dupe()),
         ref other => Value::exception(other.to_string()),
      })
   });
}

fn join(arguments: &[Value], readably: bool, separator: &str) -> String {
   let mut joined = String::new();

   for (index, argument) in arguments.iter().enumerate() {
      if index > 0 {
         joined.push_str(separator);
      }

      let _ = write!(joined, "{argument}", argument = argument.print(readably));
   }

   joined
}

fn print_line(line: &str) -> Result {
   writeln!(io::stdout().lock(), "{line}")
      .map_err(|error| Value::exception(format!("failed to write to stdout: {error}")))?;

   Ok(Value::Nil)
}

fn readline(arguments: &[Value], _: &Env) -> Result {
   arity("readline", arguments, 1)?;

   let prompt = string("readline", &arguments[0])?;

   let mut stdout = io::stdout().lock();
   write!(stdout, "{prompt}")
      .and_then(|()| stdout.flush())
      .map_err(|error| Value::exception(format!("failed to write to stdout: {error}")))?;

   let mut line = String::new();
   let bytes = io::stdin()
      .lock()
      .read_line(&mut line)
      .map_err(|error| Value::exception(format!("failed to read from stdin: {error}")))?;

   if bytes == 0 {
      return Ok(Value::Nil);
   }

   let line = line.strip_suffix('\n').unwrap_or(&line);
   let line = line.strip_suffix('\r').unwrap_or(line);

   Ok(Value::from(line))
}

fn slurp(path: &str) -> Result<String> {
   fs::read_to_string(path)
      .map_err(|error| Value::exception(format!("failed to read '{path}': {error}")))
}

fn load_file(arguments: &[Value], env: &Env) -> Result {
   arity("load-file", arguments, 1)?;

   let path = string("load-file", &arguments[0])?;
   let source = slurp(path)?;

   let forms = read_all(&source)
      .map_err(|error| Value::exception(format!("failed to read '{path}': {error}")))?;

   let global = env.global();
   for form in forms {
      let value = eval(form, &global);

      if value.is_exception() {
         return Err(value);
      }
   }

   tracing::debug!(%path, "loaded file");

   Ok(Value::Nil)
}
