use std::{
   cell::RefCell,
   rc::Rc,
};

use mal_util::Dupe;

use crate::Value;

/// A mutable cell. Every clone refers to the same cell.
#[derive(Clone)]
pub struct Atom(Rc<RefCell<Value>>);

impl Dupe for Atom {}

impl PartialEq for Atom {
   fn eq(&self, other: &Self) -> bool {
      Rc::ptr_eq(&self.0, &other.0)
   }
}

impl Atom {
   #[must_use]
   pub fn new(value: Value) -> Self {
      Self(Rc::new(RefCell::new(value)))
   }

   #[must_use]
   pub fn get(&self) -> Value {
      self.0.borrow().dupe()
   }

   pub fn set(&self, value: Value) {
      *self.0.borrow_mut() = value;
   }
}
