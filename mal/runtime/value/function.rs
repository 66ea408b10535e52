use std::{
   fmt,
   rc::Rc,
};

use mal_util::Dupe;

use crate::{
   Env,
   Value,
   value::{
      Meta,
      SString,
   },
};

/// A parsed parameter list: positional names and an optional rest name
/// introduced by `&`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
   pub positional: Vec<SString>,
   pub rest:       Option<SString>,
}

impl Params {
   /// Parses a list or vector of symbols.
   ///
   /// `&` must be followed by exactly one symbol, which collects the remaining
   /// arguments.
   pub fn parse(form: &Value) -> Result<Self, Value> {
      let Some(items) = form.sequence() else {
         return Err(Value::exception(format!(
            "parameters must be a list or vector, got {type_name}",
            type_name = form.type_name(),
         )));
      };

      let mut positional = Vec::new();
      let mut items = items.peekable();

      while let Some(item) = items.next() {
         let Value::Symbol(ref name) = *item else {
            return Err(Value::exception(format!(
               "parameter must be a symbol, got {type_name}",
               type_name = item.type_name(),
            )));
         };

         if &**name != "&" {
            positional.push(name.dupe());
            continue;
         }

         let (Some(&Value::Symbol(ref rest)), None) = (items.next(), items.peek()) else {
            return Err(Value::exception(
               "'&' must be followed by exactly one symbol",
            ));
         };

         return Ok(Self {
            positional,
            rest: Some(rest.dupe()),
         });
      }

      Ok(Self {
         positional,
         rest: None,
      })
   }

   /// Checks that the argument count fits these parameters.
   pub fn check_arity(&self, count: usize) -> Result<(), Value> {
      let expected = self.positional.len();

      match self.rest {
         Some(_) if count < expected => {
            Err(Value::exception(format!(
               "wrong number of arguments: expected at least {expected}, got {count}",
            )))
         },

         None if count != expected => {
            Err(Value::exception(format!(
               "wrong number of arguments: expected {expected}, got {count}",
            )))
         },

         _ => Ok(()),
      }
   }
}

/// A user defined function or macro.
pub struct Closure {
   pub params:   Params,
   pub body:     Value,
   /// The environment the closure was created in. Calls push a fresh frame
   /// on top of it.
   pub env:      Env,
   pub is_macro: bool,
   pub meta:     Meta,
}

impl Closure {
   /// Returns a copy of this closure flagged as a macro.
   #[must_use]
   pub fn to_macro(&self) -> Self {
      Self {
         params:   self.params.clone(),
         body:     self.body.dupe(),
         env:      self.env.dupe(),
         is_macro: true,
         meta:     self.meta.dupe(),
      }
   }

   /// Returns a copy of this closure carrying the given metadata.
   #[must_use]
   pub fn with_meta(&self, meta: Meta) -> Self {
      Self {
         params:   self.params.clone(),
         body:     self.body.dupe(),
         env:      self.env.dupe(),
         is_macro: self.is_macro,
         meta,
      }
   }
}

type Function = dyn Fn(&[Value], &Env) -> Value;

/// A built-in function implemented in Rust.
#[derive(Clone)]
pub struct Native {
   name:     &'static str,
   function: Rc<Function>,
   meta:     Meta,
}

impl Dupe for Native {}

impl fmt::Debug for Native {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(writer, "#<native {name}>", name = self.name)
   }
}

impl PartialEq for Native {
   fn eq(&self, other: &Self) -> bool {
      Rc::ptr_eq(&self.function, &other.function)
   }
}

impl Native {
   pub fn new(name: &'static str, function: impl Fn(&[Value], &Env) -> Value + 'static) -> Self {
      Self {
         name,
         function: Rc::new(function),
         meta: Meta::default(),
      }
   }

   #[must_use]
   pub fn meta(&self) -> &Meta {
      &self.meta
   }

   /// Returns a copy of this native carrying the given metadata. The copy
   /// still compares equal to the original.
   #[must_use]
   pub fn with_meta(&self, meta: Meta) -> Self {
      Self {
         meta,
         ..self.dupe()
      }
   }

   #[must_use]
   pub fn name(&self) -> &'static str {
      self.name
   }

   pub fn call(&self, arguments: &[Value], env: &Env) -> Value {
      (self.function)(arguments, env)
   }
}
