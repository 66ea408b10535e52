use std::fmt::{
   self,
   Write as _,
};

use mal_util::Dupe as _;

use crate::{
   Value,
   value::{
      Atom,
      Key,
   },
};

/// A [`Display`](fmt::Display) adaptor created by [`Value::print`].
#[derive(Clone, Copy)]
pub struct Print<'a> {
   pub(super) value:    &'a Value,
   pub(super) readably: bool,
}

impl fmt::Display for Print<'_> {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      Printer {
         writer,
         readably: self.readably,
         atoms: Vec::new(),
      }
      .write(self.value)
   }
}

struct Printer<'a, 'b> {
   writer:   &'a mut fmt::Formatter<'b>,
   readably: bool,
   /// The atoms being printed on the current path. An atom that contains
   /// itself prints as `(atom ...)` on re-entry.
   atoms:    Vec<Atom>,
}

impl Printer<'_, '_> {
   fn write_string(&mut self, string: &str) -> fmt::Result {
      if !self.readably {
         return self.writer.write_str(string);
      }

      self.writer.write_char('"')?;
      mal_syntax::escape(&mut *self.writer, string)?;
      self.writer.write_char('"')
   }

   fn write_items<'v>(&mut self, items: impl Iterator<Item = &'v Value>) -> fmt::Result {
      let mut items = items.peekable();
      while let Some(item) = items.next() {
         self.write(item)?;

         if items.peek().is_some() {
            self.writer.write_char(' ')?;
         }
      }

      Ok(())
   }

   #[stacksafe::stacksafe]
   fn write(&mut self, value: &Value) -> fmt::Result {
      match *value {
         Value::Nil => self.writer.write_str("nil"),
         Value::Boolean(boolean) => write!(self.writer, "{boolean}"),
         Value::Number(number) => write!(self.writer, "{number}"),

         Value::String(ref string) => self.write_string(string),
         Value::Symbol(ref symbol) => self.writer.write_str(symbol),
         Value::Keyword(ref keyword) => write!(self.writer, ":{keyword}"),

         Value::List(ref list, _) => {
            self.writer.write_char('(')?;
            self.write_items(list.iter())?;
            self.writer.write_char(')')
         },

         Value::Vector(ref vector, _) => {
            self.writer.write_char('[')?;
            self.write_items(vector.iter())?;
            self.writer.write_char(']')
         },

         Value::Map(ref map, _) => {
            self.writer.write_char('{')?;

            let mut entries = map.sorted().into_iter().peekable();
            while let Some((key, value)) = entries.next() {
               match *key {
                  Key::String(ref string) => self.write_string(string)?,
                  Key::Keyword(ref keyword) => write!(self.writer, ":{keyword}")?,
               }

               self.writer.write_char(' ')?;
               self.write(value)?;

               if entries.peek().is_some() {
                  self.writer.write_char(' ')?;
               }
            }

            self.writer.write_char('}')
         },

         Value::Atom(ref atom) if self.atoms.contains(atom) => self.writer.write_str("(atom ...)"),

         Value::Atom(ref atom) => {
            self.atoms.push(atom.dupe());

            self.writer.write_str("(atom ")?;
            self.write(&atom.get())?;
            self.writer.write_char(')')?;

            self.atoms.pop();
            Ok(())
         },

         Value::Closure(ref closure) if closure.is_macro => self.writer.write_str("#<macro>"),
         Value::Closure(_) => self.writer.write_str("#<function>"),
         Value::Native(ref native) => write!(self.writer, "#<native {name}>", name = native.name()),

         Value::Exception(ref message) => write!(self.writer, "Exception: {message}"),
      }
   }
}
