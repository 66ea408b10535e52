use std::rc;

/// Wraps the receiver in an [`Rc`](rc::Rc) at the end of a call chain.
pub trait Rc {
   fn rc(self) -> rc::Rc<Self>
   where
      Self: Sized,
   {
      rc::Rc::new(self)
   }
}

impl<T> Rc for T {}
