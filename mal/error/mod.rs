//! Error handling utilities for host-level failures.
//!
//! Language-level errors never reach this crate: they are exception values
//! that flow through evaluation. A [`Chain`] is reserved for things the
//! interpreter itself cannot recover from, like an unreadable script or a
//! closed standard output.

use std::{
   fmt,
   process,
   result,
};

use mal_util::Dupe;
use yansi::Paint as _;

/// Creates a [`Chain`] from the provided format arguments.
///
/// # Example
///
/// ```rs
/// fn get_result() -> Result<()> {
///   Err(chain!("can't get the result"))
/// }
/// ```
#[macro_export]
macro_rules! chain {
   ($($t:tt)*) => {
      $crate::Chain::new().push_front_display(format!($($t)*))
   };
}

/// A macro that boils down to:
///
/// ```rs
/// return Err(chain!(arguments));
/// ```
#[macro_export]
macro_rules! bail {
   ($($t:tt)*) => {
      return Err($crate::chain!($($t)*))
   };
}

/// A type alias for concise use of [`Chain`] with [`Result`](result::Result).
pub type Result<T> = result::Result<T, Chain>;

type Link = Box<dyn fmt::Display + Send + Sync + 'static>;

/// A chain of error messages, outermost context first.
#[derive(Clone)]
pub struct Chain(rpds::ListSync<Link>);

impl Dupe for Chain {}

impl fmt::Debug for Chain {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      writer
         .debug_list()
         .entries(self.0.iter().map(ToString::to_string))
         .finish()
   }
}

impl fmt::Display for Chain {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      let reverse = self.0.reverse();
      let mut chain = reverse.iter().peekable();

      while let Some(link) = chain.next() {
         let header = if chain.peek().is_none() {
            "error:"
         } else {
            "cause:"
         };

         write!(writer, "{header} ", header = header.red().bold())?;

         let string = link.to_string();
         let mut chars = string.char_indices();

         if let Some((_, first)) = chars.next()
            && let Some((second_start, second)) = chars.next()
            && second.is_lowercase()
         {
            writeln!(
               writer,
               "{first_lowercase}{rest}",
               first_lowercase = first.to_lowercase(),
               rest = &string[second_start..],
            )?;
         } else {
            writeln!(writer, "{string}")?;
         }
      }

      Ok(())
   }
}

impl Chain {
   #[must_use]
   pub fn new() -> Self {
      Self(rpds::List::new_sync())
   }

   #[must_use]
   pub fn push_front_display(&self, display: impl fmt::Display + Send + Sync + 'static) -> Self {
      Self(self.0.push_front(Box::new(display)))
   }
}

pub trait ResultExt<T> {
   fn chain_err(self, display: impl fmt::Display + Send + Sync + 'static) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for result::Result<T, E> {
   fn chain_err(self, display: impl fmt::Display + Send + Sync + 'static) -> Result<T> {
      self.map_err(|exist| {
         Chain::new()
            .push_front_display(exist)
            .push_front_display(display)
      })
   }
}

impl<T> ResultExt<T> for Result<T> {
   fn chain_err(self, display: impl fmt::Display + Send + Sync + 'static) -> Result<T> {
      self.map_err(|chain| chain.push_front_display(display))
   }
}

/// The termination type. Meant to be used as the return type of the main
/// function.
///
/// Created from a [`Result`] with [`From`], prints the chain to standard
/// error on failure.
#[derive(Debug, Clone)]
pub struct Termination(Result<()>);

impl Dupe for Termination {}

impl From<Result<()>> for Termination {
   fn from(result: Result<()>) -> Self {
      Self(result)
   }
}

impl process::Termination for Termination {
   fn report(self) -> process::ExitCode {
      match self.0 {
         Ok(()) => process::ExitCode::SUCCESS,

         Err(chain) => {
            eprint!("{chain}");
            process::ExitCode::FAILURE
         },
      }
   }
}

#[cfg(test)]
mod tests {
   use std::io;

   use super::*;

   fn plain(chain: &Chain) -> String {
      yansi::disable();
      chain.to_string()
   }

   #[test]
   fn chain_prints_causes_before_error() {
      let result: result::Result<(), io::Error> =
         Err(io::Error::new(io::ErrorKind::NotFound, "No such file"));

      let chain = result
         .chain_err("failed to read 'core.mal'")
         .chain_err("failed to load prelude")
         .unwrap_err();

      assert_eq!(
         plain(&chain),
         "cause: no such file\ncause: failed to read 'core.mal'\nerror: failed to load prelude\n",
      );
   }

   #[test]
   fn pushed_display_is_outermost() {
      let chain = chain!("inner").push_front_display("outer");

      assert_eq!(plain(&chain), "cause: inner\nerror: outer\n");
   }

   #[test]
   fn bail_returns_early() {
      fn failing(fail: bool) -> Result<u8> {
         if fail {
            bail!("gave up after {count} tries", count = 3);
         }

         Ok(1)
      }

      assert_eq!(failing(false).unwrap(), 1);
      assert_eq!(plain(&failing(true).unwrap_err()), "error: gave up after 3 tries\n");
   }

   #[test]
   fn uppercase_acronyms_are_kept() {
      assert_eq!(plain(&chain!("IO failure")), "error: IO failure\n");
   }
}
