use std::rc::Rc;

use mal_util::Dupe;

use crate::Value;

/// Metadata attached to a collection or function with `with-meta`.
///
/// Metadata never takes part in equality or printing.
#[derive(Clone, Default)]
pub struct Meta(Option<Rc<Value>>);

impl Dupe for Meta {}

impl Meta {
   #[must_use]
   pub fn new(value: Value) -> Self {
      Self(Some(Rc::new(value)))
   }

   /// Returns the metadata, or nil when none was attached.
   #[must_use]
   pub fn get(&self) -> Value {
      self.0.as_deref().map_or(Value::Nil, Dupe::dupe)
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn missing_metadata_is_nil() {
      assert_eq!(Meta::default().get(), Value::Nil);
      assert_eq!(Meta::new(Value::Number(1)).get(), Value::Number(1));
   }
}
