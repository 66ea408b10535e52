use std::{
   fmt,
   ops,
};

use mal_util::Dupe;

/// A cheaply cloneable immutable string.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[expect(clippy::module_name_repetitions)]
pub struct SString(#[doc(hidden)] pub arcstr::Substr);

impl Dupe for SString {}

#[doc(hidden)]
pub mod private {
   pub use arcstr::literal_substr;
}

/// Creates an [`SString`] from a string literal without allocating.
#[macro_export]
#[expect(clippy::module_name_repetitions)]
macro_rules! __string_new {
   ($s:literal $(,)?) => {
      $crate::value::SString($crate::value::string::private::literal_substr!($s))
   };
}

pub use crate::__string_new as new;

impl From<&str> for SString {
   fn from(s: &str) -> Self {
      Self(arcstr::Substr::from(s))
   }
}

impl From<String> for SString {
   fn from(s: String) -> Self {
      Self(arcstr::Substr::full(arcstr::ArcStr::from(s)))
   }
}

impl ops::Deref for SString {
   type Target = str;

   fn deref(&self) -> &Self::Target {
      &self.0
   }
}

impl fmt::Display for SString {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      writer.write_str(self)
   }
}

impl fmt::Debug for SString {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      fmt::Debug::fmt(&**self, writer)
   }
}
