//! Miscellaneous utilities.

mod dupe;
pub use dupe::{
   Dupe,
   OptionDupedExt,
};

pub mod suffix;

/// Rebind an identifier with concise call-chain syntax.
///
/// # Example
///
/// ```rs
/// call!(mut items.into_iter().rev());
/// // let mut items = items.into_iter().rev();
/// ```
#[macro_export]
macro_rules! call {
   (mut $identifier:ident $($call:tt)+ $(,)?) => {
      let mut $identifier = $identifier $($call)+;
   };

   ($identifier:ident $($call:tt)+ $(,)?) => {
      let $identifier = $identifier $($call)+;
   };
}

macro_rules! call_alias {
   ([$d:tt] $name:ident => $($call:tt)+) => {
      #[doc = concat!("Alias for `call!` with `", stringify!($($call)+), "` as the suffix, with multiple identifier support.")]
      #[macro_export]
      macro_rules! $name {
         ($d(mut $d identifier:ident),* $d(,)?) => {
            $d(let mut $d identifier = $d identifier $($call)+;)*
         };

         ($d($d identifier:ident),* $d(,)?) => {
            $d(let $d identifier = $d identifier $($call)+;)*
         };
      }
   };

   ($($call:tt)+) => {
      call_alias!([$] $($call)+);
   };
}

call_alias!(collect_vec => .into_iter().collect::<Vec<_>>());
call_alias!(into => .into());

#[cfg(test)]
mod tests {
   #[test]
   fn call_rebinds() {
      let items = vec![3, 1, 2];
      call!(mut items.into_iter().rev());

      assert_eq!(items.next(), Some(2));
   }

   #[test]
   fn aliases_rebind_every_identifier() {
      let (first, second) = ("first", "second");
      into!(first, second);
      let (first, second): (String, String) = (first, second);

      assert_eq!(first, "first");
      assert_eq!(second, "second");

      let numbers = [1, 2, 3];
      collect_vec!(numbers);
      assert_eq!(numbers, vec![1, 2, 3]);
   }
}
