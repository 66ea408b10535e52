//! Token kinds, the tokenizer and string escaping.

mod string;
mod tokenizer;

pub use self::{
   string::{
      InvalidEscape,
      escape,
      unescape,
   },
   tokenizer::tokenize,
};

/// The token kind.
#[derive(derive_more::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(non_camel_case_types)]
pub enum Kind {
   /// A string literal that reached the end of the input before its closing
   /// quote.
   #[display("an unterminated string")]
   TOKEN_ERROR_UNTERMINATED_STRING,

   /// Whitespace and commas. Commas are whitespace in this language.
   #[display("whitespace")]
   TOKEN_SPACE,

   /// Anything that starts with a `;`, up to the end of the line.
   #[display("a comment")]
   TOKEN_COMMENT,

   #[display("'('")]
   TOKEN_PARENTHESIS_LEFT,
   #[display("')'")]
   TOKEN_PARENTHESIS_RIGHT,
   #[display("'['")]
   TOKEN_BRACKET_LEFT,
   #[display("']'")]
   TOKEN_BRACKET_RIGHT,
   #[display("'{{'")]
   TOKEN_CURLYBRACE_LEFT,
   #[display("'}}'")]
   TOKEN_CURLYBRACE_RIGHT,

   #[display("'''")]
   TOKEN_QUOTE,
   #[display("'`'")]
   TOKEN_BACKTICK,
   #[display("'~'")]
   TOKEN_TILDE,
   #[display("'~@'")]
   TOKEN_TILDE_AT,
   #[display("'@'")]
   TOKEN_AT,
   #[display("'^'")]
   TOKEN_CARET,

   /// A complete string literal, quotes included. The content is still
   /// escaped.
   #[display("a string")]
   TOKEN_STRING,

   /// An optionally negative run of ASCII digits.
   #[display("an integer")]
   TOKEN_INTEGER,

   /// Anything starting with a `:`.
   #[display("a keyword")]
   TOKEN_KEYWORD,

   /// Every other atom, including `nil`, `true` and `false`.
   #[display("a symbol")]
   TOKEN_SYMBOL,
}

impl Kind {
   /// Whether the reader skips this token.
   #[must_use]
   pub fn is_trivia(self) -> bool {
      matches!(self, Self::TOKEN_SPACE | Self::TOKEN_COMMENT)
   }

   /// Whether this token is a reader macro prefix.
   #[must_use]
   pub fn is_reader_macro(self) -> bool {
      matches!(
         self,
         Self::TOKEN_QUOTE
            | Self::TOKEN_BACKTICK
            | Self::TOKEN_TILDE
            | Self::TOKEN_TILDE_AT
            | Self::TOKEN_AT
            | Self::TOKEN_CARET
      )
   }

   /// Returns the closing delimiter for an opening one.
   #[must_use]
   pub fn closing(self) -> Option<Self> {
      Some(match self {
         Self::TOKEN_PARENTHESIS_LEFT => Self::TOKEN_PARENTHESIS_RIGHT,
         Self::TOKEN_BRACKET_LEFT => Self::TOKEN_BRACKET_RIGHT,
         Self::TOKEN_CURLYBRACE_LEFT => Self::TOKEN_CURLYBRACE_RIGHT,
         _ => return None,
      })
   }
}
