//! The mal language: a small Lisp with closures, macros, atoms and
//! exceptions as values.

pub use mal_error as error;
pub use mal_runtime as runtime;
pub use mal_syntax as syntax;
pub use mal_util as util;
