//! Cheap clone trait for telling reference count bumps apart from deep
//! copies.

use std::{
   cell,
   hash,
   rc,
};

use archery::SharedPointerKind;

/// A [`Clone`] that is known to be cheap: a reference count increment or a
/// bitwise copy. Persistent collections share their structure, so they are
/// [`Dupe`] too.
pub trait Dupe: Clone {
   #[inline]
   #[must_use]
   fn dupe(&self) -> Self {
      self.clone()
   }
}

pub trait OptionDupedExt {
   type Item;

   fn duped(self) -> Option<Self::Item>;
}

impl<T: Dupe> OptionDupedExt for Option<&T> {
   type Item = T;

   fn duped(self) -> Option<T> {
      self.map(Dupe::dupe)
   }
}

impl<A: ?Sized> Dupe for rc::Rc<A> {}

impl<A: ?Sized> Dupe for rc::Weak<A> {}

impl<A: Copy> Dupe for cell::Cell<A> {}

impl<A: Dupe> Dupe for Option<A> {}

impl<A: Dupe, B: Dupe> Dupe for (A, B) {}

impl Dupe for bool {}

impl Dupe for i64 {}

impl Dupe for usize {}

impl<T, P: SharedPointerKind> Dupe for rpds::List<T, P> {}

impl<T, P: SharedPointerKind> Dupe for rpds::Vector<T, P> {}

impl<K: Eq + hash::Hash, V, P: SharedPointerKind, H: hash::BuildHasher + Clone> Dupe
   for rpds::HashTrieMap<K, V, P, H>
{
}
