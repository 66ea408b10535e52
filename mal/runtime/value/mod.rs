//! The value model. Source code and runtime data share the same
//! representation.

use std::{
   fmt,
   mem,
   rc::Rc,
};

use derive_more::From;
use either::Either;
use mal_util::{
   Dupe,
   into,
};

mod atom;
pub use atom::Atom;

mod function;
pub use function::{
   Closure,
   Native,
   Params,
};

pub mod map;
pub use map::{
   Key,
   Map,
};

mod meta;
pub use meta::Meta;

mod print;
pub use print::Print;

pub mod string;
pub use string::SString;

/// A persistent singly linked list. `rest` and `cons` share structure with
/// their input.
pub type List = rpds::List<Value>;

/// A persistent vector.
pub type Vector = rpds::Vector<Value>;

#[derive(Clone, From)]
pub enum Value {
   Nil,

   Boolean(bool),

   Number(i64),

   String(SString),

   #[from(ignore)]
   Symbol(SString),
   #[from(ignore)]
   Keyword(SString),

   #[from(ignore)]
   List(List, Meta),
   #[from(ignore)]
   Vector(Vector, Meta),
   #[from(ignore)]
   Map(Map, Meta),

   Atom(Atom),

   Closure(Rc<Closure>),
   Native(Native),

   #[from(ignore)]
   Exception(SString),
}

impl Dupe for Value {}

/// Drops a container taken out of a value. Deeply nested data drops one
/// level per call, so the stack grows on demand instead of overflowing.
#[stacksafe::stacksafe]
fn release<T>(container: T) {
   drop(container);
}

impl Drop for Value {
   fn drop(&mut self) {
      match *self {
         Self::List(ref mut list, _) if !list.is_empty() => {
            release(mem::replace(list, List::new()));
         },

         Self::Vector(ref mut vector, _) if !vector.is_empty() => {
            release(mem::replace(vector, Vector::new()));
         },

         Self::Map(ref mut map, _) if !map.is_empty() => {
            release(mem::replace(map, Map::new()));
         },

         _ => {},
      }
   }
}

impl PartialEq for Value {
   #[stacksafe::stacksafe]
   fn eq(&self, other: &Self) -> bool {
      match (self, other) {
         (&Self::Nil, &Self::Nil) => true,
         (&Self::Boolean(left), &Self::Boolean(right)) => left == right,
         (&Self::Number(left), &Self::Number(right)) => left == right,
         (&Self::String(ref left), &Self::String(ref right))
         | (&Self::Symbol(ref left), &Self::Symbol(ref right))
         | (&Self::Keyword(ref left), &Self::Keyword(ref right))
         | (&Self::Exception(ref left), &Self::Exception(ref right)) => left == right,

         (&Self::Map(ref left, _), &Self::Map(ref right, _)) => left == right,
         (&Self::Atom(ref left), &Self::Atom(ref right)) => left == right,
         (&Self::Closure(ref left), &Self::Closure(ref right)) => Rc::ptr_eq(left, right),
         (&Self::Native(ref left), &Self::Native(ref right)) => left == right,

         (left, right) => {
            match (left.sequence(), right.sequence()) {
               (Some(left), Some(right)) => left.eq(right),
               _ => false,
            }
         },
      }
   }
}

impl fmt::Display for Value {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      fmt::Display::fmt(&self.print(true), writer)
   }
}

impl fmt::Debug for Value {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      fmt::Display::fmt(&self.print(true), writer)
   }
}

impl From<&str> for Value {
   fn from(s: &str) -> Self {
      Self::String(s.into())
   }
}

impl From<List> for Value {
   fn from(list: List) -> Self {
      Self::List(list, Meta::default())
   }
}

impl From<Vector> for Value {
   fn from(vector: Vector) -> Self {
      Self::Vector(vector, Meta::default())
   }
}

impl From<Map> for Value {
   fn from(map: Map) -> Self {
      Self::Map(map, Meta::default())
   }
}

impl FromIterator<Value> for Value {
   /// Collects into a [`Value::List`].
   fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
      Self::from(iter.into_iter().collect::<List>())
   }
}

impl Value {
   #[must_use]
   pub fn exception(message: impl Into<SString>) -> Self {
      into!(message);

      Self::Exception(message)
   }

   #[must_use]
   pub fn symbol(name: impl Into<SString>) -> Self {
      Self::Symbol(name.into())
   }

   #[must_use]
   pub fn keyword(name: impl Into<SString>) -> Self {
      Self::Keyword(name.into())
   }

   /// Creates a list from the given items, in order.
   #[must_use]
   pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
      items.into_iter().collect()
   }

   /// Creates a vector from the given items, in order.
   #[must_use]
   pub fn vector(items: impl IntoIterator<Item = Value>) -> Self {
      Self::from(items.into_iter().collect::<Vector>())
   }

   #[must_use]
   pub fn is_exception(&self) -> bool {
      matches!(*self, Self::Exception(_))
   }

   /// Everything except `nil` and `false` is truthy.
   #[must_use]
   pub fn is_truthy(&self) -> bool {
      !matches!(*self, Self::Nil | Self::Boolean(false))
   }

   /// Whether this is the symbol with the given name.
   #[must_use]
   pub fn is_symbol(&self, name: &str) -> bool {
      matches!(*self, Self::Symbol(ref symbol) if &**symbol == name)
   }

   #[must_use]
   pub fn type_name(&self) -> &'static str {
      match *self {
         Self::Nil => "nil",
         Self::Boolean(_) => "boolean",
         Self::Number(_) => "number",
         Self::String(_) => "string",
         Self::Symbol(_) => "symbol",
         Self::Keyword(_) => "keyword",
         Self::List(..) => "list",
         Self::Vector(..) => "vector",
         Self::Map(..) => "map",
         Self::Atom(_) => "atom",
         Self::Closure(ref closure) if closure.is_macro => "macro",
         Self::Closure(_) | Self::Native(_) => "function",
         Self::Exception(_) => "exception",
      }
   }

   /// Returns the items of a list or vector.
   #[must_use]
   pub fn sequence(&self) -> Option<impl Iterator<Item = &Value>> {
      match *self {
         Self::List(ref list, _) => Some(Either::Left(list.iter())),
         Self::Vector(ref vector, _) => Some(Either::Right(vector.iter())),
         _ => None,
      }
   }

   /// Returns the elements of a list, or `None` for any other value.
   #[must_use]
   pub fn as_list(&self) -> Option<&List> {
      match *self {
         Self::List(ref list, _) => Some(list),
         _ => None,
      }
   }

   /// Returns the metadata of a collection or function. Other values have
   /// none.
   #[must_use]
   pub fn meta(&self) -> Option<Value> {
      match *self {
         Self::List(_, ref meta) | Self::Vector(_, ref meta) | Self::Map(_, ref meta) => {
            Some(meta.get())
         },
         Self::Closure(ref closure) => Some(closure.meta.get()),
         Self::Native(ref native) => Some(native.meta().get()),
         _ => None,
      }
   }

   /// Returns a copy of a collection or function carrying the given
   /// metadata, or `None` for values that cannot carry any.
   #[must_use]
   pub fn with_meta(&self, meta: Value) -> Option<Self> {
      let meta = Meta::new(meta);

      Some(match *self {
         Self::List(ref list, _) => Self::List(list.dupe(), meta),
         Self::Vector(ref vector, _) => Self::Vector(vector.dupe(), meta),
         Self::Map(ref map, _) => Self::Map(map.dupe(), meta),
         Self::Closure(ref closure) => Self::Closure(Rc::new(closure.with_meta(meta))),
         Self::Native(ref native) => Self::Native(native.with_meta(meta)),
         _ => return None,
      })
   }

   /// Returns a [`Display`](fmt::Display) adaptor.
   ///
   /// When `readably` is set, strings are quoted and escaped so that the
   /// output reads back as the same value.
   #[must_use]
   pub fn print(&self, readably: bool) -> Print<'_> {
      Print {
         value: self,
         readably,
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn truthiness() {
      assert!(!Value::Nil.is_truthy());
      assert!(!Value::Boolean(false).is_truthy());
      assert!(Value::Boolean(true).is_truthy());
      assert!(Value::Number(0).is_truthy());
      assert!(Value::from("").is_truthy());
      assert!(Value::list([]).is_truthy());
   }

   #[test]
   fn lists_equal_vectors_with_same_items() {
      let list = Value::list([Value::Number(1), Value::Number(2)]);
      let vector = Value::vector([Value::Number(1), Value::Number(2)]);

      assert_eq!(list, vector);
      assert_ne!(list, Value::list([Value::Number(1)]));
   }

   #[test]
   fn strings_symbols_and_keywords_differ() {
      assert_ne!(Value::from("a"), Value::symbol("a"));
      assert_ne!(Value::symbol("a"), Value::keyword("a"));
      assert_eq!(Value::keyword("a"), Value::keyword("a"));
   }

   #[test]
   fn rest_shares_without_mutating() {
      let list: List = [1, 2, 3].into_iter().map(Value::Number).collect();
      let rest = list.drop_first().unwrap();

      assert_eq!(list.len(), 3);
      assert_eq!(rest.len(), 2);
      assert_eq!(list.first(), Some(&Value::Number(1)));
   }

   #[test]
   fn metadata_is_copied_not_shared() {
      let vector = Value::vector([Value::Number(1)]);
      let tagged = vector.with_meta(Value::keyword("tag")).unwrap();

      assert_eq!(vector.meta(), Some(Value::Nil));
      assert_eq!(tagged.meta(), Some(Value::keyword("tag")));
      assert_eq!(tagged, vector);
      assert!(Value::Number(1).with_meta(Value::Nil).is_none());
   }

   #[test]
   fn deep_nesting_compares_prints_and_drops() {
      let nest = |depth: usize| {
         let mut value = Value::list([]);
         for _ in 0..depth {
            value = Value::list([value]);
         }
         value
      };

      let left = nest(200_000);
      let right = nest(200_000);

      assert!(left == right);
      assert!(left != nest(199_999));

      let printed = left.to_string();
      assert_eq!(printed.len(), 2 * 200_001);
      assert!(printed.starts_with("(((") && printed.ends_with(")))"));

      drop(left);
      drop(right);
   }

   #[test]
   fn type_names() {
      assert_eq!(Value::Nil.type_name(), "nil");
      assert_eq!(Value::keyword("k").type_name(), "keyword");
      assert_eq!(Value::exception("x").type_name(), "exception");
   }
}
