//! Reading source text into values.

use mal_syntax::{
   Kind::{
      self,
      *,
   },
   tokenize,
};
use peekmore::{
   PeekMore as _,
   PeekMoreIterator as PeekMore,
};

use crate::{
   Value,
   value::{
      Key,
      List,
      Map,
      Vector,
   },
};

/// A malformed input. Reading never panics, every problem is one of these.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
   #[error("expected {expected}, got EOF")]
   UnexpectedEof { expected: Kind },

   #[error("unexpected {found}")]
   UnexpectedClosing { found: Kind },

   #[error("expected a form after {prefix}, got EOF")]
   MissingForm { prefix: Kind },

   #[error("unterminated string")]
   UnterminatedString,

   #[error("invalid escape sequence '\\{character}' in string")]
   InvalidEscape { character: char },

   #[error("map literal must contain an even number of forms")]
   OddMap,

   #[error("map keys must be strings or keywords, got {key}")]
   InvalidMapKey { key: String },

   #[error("integer {literal} is out of range")]
   IntegerOutOfRange { literal: String },
}

/// Reads the first form of the source. Returns `None` if the source contains
/// no forms.
pub fn read(source: &str) -> Result<Option<Value>, ReadError> {
   Reader::with_tokens(significant(source)).read_form()
}

/// Reads every form of the source.
pub fn read_all(source: &str) -> Result<Vec<Value>, ReadError> {
   let mut reader = Reader::with_tokens(significant(source));
   let mut forms = Vec::new();

   while let Some(form) = reader.read_form()? {
      forms.push(form);
   }

   Ok(forms)
}

fn significant(source: &str) -> impl Iterator<Item = (Kind, &str)> {
   tokenize(source).filter(|&(kind, _)| !kind.is_trivia())
}

struct Reader<I: Iterator> {
   tokens: PeekMore<I>,
}

impl<'a, I: Iterator<Item = (Kind, &'a str)>> Reader<I> {
   fn with_tokens(tokens: I) -> Self {
      Self {
         tokens: tokens.peekmore(),
      }
   }

   fn peek(&mut self) -> Option<Kind> {
      self.tokens.peek().map(|&(kind, _)| kind)
   }

   #[stacksafe::stacksafe]
   fn read_form(&mut self) -> Result<Option<Value>, ReadError> {
      let Some((kind, slice)) = self.tokens.next() else {
         return Ok(None);
      };

      let value = match kind {
         TOKEN_PARENTHESIS_LEFT => {
            Value::from(self.read_sequence(TOKEN_PARENTHESIS_RIGHT)?.into_iter().collect::<List>())
         },

         TOKEN_BRACKET_LEFT => {
            Value::from(self.read_sequence(TOKEN_BRACKET_RIGHT)?.into_iter().collect::<Vector>())
         },

         TOKEN_CURLYBRACE_LEFT => Value::from(self.read_map()?),

         TOKEN_PARENTHESIS_RIGHT | TOKEN_BRACKET_RIGHT | TOKEN_CURLYBRACE_RIGHT => {
            return Err(ReadError::UnexpectedClosing { found: kind });
         },

         TOKEN_QUOTE => self.read_prefixed(kind, "quote")?,
         TOKEN_BACKTICK => self.read_prefixed(kind, "quasiquote")?,
         TOKEN_TILDE => self.read_prefixed(kind, "unquote")?,
         TOKEN_TILDE_AT => self.read_prefixed(kind, "splice-unquote")?,
         TOKEN_AT => self.read_prefixed(kind, "deref")?,

         TOKEN_CARET => {
            let meta = self.read_required(kind)?;
            let form = self.read_required(kind)?;

            Value::list([Value::symbol("with-meta"), form, meta])
         },

         TOKEN_STRING => {
            let content = &slice[1..slice.len() - 1];

            Value::String(
               mal_syntax::unescape(content)
                  .map_err(|invalid| {
                     ReadError::InvalidEscape {
                        character: invalid.character,
                     }
                  })?
                  .into(),
            )
         },

         TOKEN_ERROR_UNTERMINATED_STRING => return Err(ReadError::UnterminatedString),

         TOKEN_INTEGER => {
            Value::Number(slice.parse().map_err(|_| {
               ReadError::IntegerOutOfRange {
                  literal: slice.to_owned(),
               }
            })?)
         },

         TOKEN_KEYWORD => Value::keyword(&slice[1..]),

         TOKEN_SYMBOL => {
            match slice {
               "nil" => Value::Nil,
               "true" => Value::Boolean(true),
               "false" => Value::Boolean(false),
               _ => Value::symbol(slice),
            }
         },

         TOKEN_SPACE | TOKEN_COMMENT => unreachable!("trivia is filtered out"),
      };

      Ok(Some(value))
   }

   fn read_required(&mut self, prefix: Kind) -> Result<Value, ReadError> {
      self
         .read_form()?
         .ok_or(ReadError::MissingForm { prefix })
   }

   fn read_prefixed(&mut self, prefix: Kind, name: &'static str) -> Result<Value, ReadError> {
      let form = self.read_required(prefix)?;

      Ok(Value::list([Value::symbol(name), form]))
   }

   fn read_sequence(&mut self, closing: Kind) -> Result<Vec<Value>, ReadError> {
      let mut items = Vec::new();

      loop {
         match self.peek() {
            None => return Err(ReadError::UnexpectedEof { expected: closing }),

            Some(kind) if kind == closing => {
               self.tokens.next();
               return Ok(items);
            },

            Some(_) => {
               if let Some(item) = self.read_form()? {
                  items.push(item);
               }
            },
         }
      }
   }

   fn read_map(&mut self) -> Result<Map, ReadError> {
      let forms = self.read_sequence(TOKEN_CURLYBRACE_RIGHT)?;

      if forms.len() % 2 != 0 {
         return Err(ReadError::OddMap);
      }

      let mut map = Map::new();
      let mut forms = forms.into_iter();
      while let (Some(key), Some(value)) = (forms.next(), forms.next()) {
         let Ok(key) = Key::try_from(&key) else {
            return Err(ReadError::InvalidMapKey {
               key: key.to_string(),
            });
         };

         map = map.insert(key, value);
      }

      Ok(map)
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   fn read_one(source: &str) -> Value {
      read(source).unwrap().unwrap()
   }

   #[test]
   fn atoms() {
      assert_eq!(read_one("42"), Value::Number(42));
      assert_eq!(read_one("-7"), Value::Number(-7));
      assert_eq!(read_one("nil"), Value::Nil);
      assert_eq!(read_one("false"), Value::Boolean(false));
      assert_eq!(read_one(":kw"), Value::keyword("kw"));
      assert_eq!(read_one("abc"), Value::symbol("abc"));
      assert_eq!(read_one(r#""a\nb""#), Value::from("a\nb"));
   }

   #[test]
   fn nested_containers() {
      let value = read_one("(a [1 2] {:k (b)})");

      assert_eq!(value.to_string(), "(a [1 2] {:k (b)})");
      assert!(matches!(value, Value::List(..)));
   }

   #[test]
   fn vectors_stay_vectors() {
      assert!(matches!(read_one("[1]"), Value::Vector(..)));
   }

   #[test]
   fn empty_input() {
      assert_eq!(read("   ; nothing here\n,,"), Ok(None));
      assert_eq!(read_all(""), Ok(vec![]));
   }

   #[test]
   fn read_all_reads_every_form() {
      let forms = read_all("1 (2) ;c\n :x").unwrap();

      assert_eq!(forms, vec![
         Value::Number(1),
         Value::list([Value::Number(2)]),
         Value::keyword("x"),
      ]);
   }

   #[test]
   fn errors() {
      assert_eq!(
         read("(1 2"),
         Err(ReadError::UnexpectedEof {
            expected: TOKEN_PARENTHESIS_RIGHT,
         }),
      );
      assert_eq!(read("(1 2").unwrap_err().to_string(), "expected ')', got EOF");
      assert_eq!(
         read("(1]"),
         Err(ReadError::UnexpectedClosing {
            found: TOKEN_BRACKET_RIGHT,
         }),
      );
      assert_eq!(read(r#""abc"#), Err(ReadError::UnterminatedString));
      assert_eq!(
         read(r#""\q""#),
         Err(ReadError::InvalidEscape { character: 'q' })
      );
      assert_eq!(read("{:a}"), Err(ReadError::OddMap));
      assert!(matches!(
         read("{1 2}"),
         Err(ReadError::InvalidMapKey { .. })
      ));
      assert_eq!(
         read("'"),
         Err(ReadError::MissingForm {
            prefix: TOKEN_QUOTE,
         }),
      );
      assert!(matches!(
         read("99999999999999999999"),
         Err(ReadError::IntegerOutOfRange { .. })
      ));
   }
}
