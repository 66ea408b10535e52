use crate::Kind::{
   self,
   *,
};

/// Returns an iterator of tokens that covers every byte of the input.
///
/// Tokenizing never fails. Malformed input shows up as error kinds that the
/// reader reports.
pub fn tokenize(input: &str) -> impl Iterator<Item = (Kind, &str)> {
   Tokenizer { input, offset: 0 }
}

/// Characters that end an atom.
fn is_atom_terminator(c: char) -> bool {
   c.is_whitespace() || matches!(c, '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '"' | '`' | ',' | ';')
}

fn is_integer(s: &str) -> bool {
   let digits = s.strip_prefix('-').unwrap_or(s);

   !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

struct Tokenizer<'a> {
   input:  &'a str,
   offset: usize,
}

impl<'a> Iterator for Tokenizer<'a> {
   type Item = (Kind, &'a str);

   fn next(&mut self) -> Option<Self::Item> {
      let start_offset = self.offset;

      let kind = self.consume_kind()?;

      Some((kind, &self.input[start_offset..self.offset]))
   }
}

impl Tokenizer<'_> {
   fn remaining(&self) -> &str {
      &self.input[self.offset..]
   }

   fn peek_character(&self) -> Option<char> {
      self.remaining().chars().next()
   }

   fn consume_character(&mut self) -> Option<char> {
      let c = self.peek_character()?;
      self.offset += c.len_utf8();
      Some(c)
   }

   fn try_consume_character(&mut self, expected: char) -> bool {
      let condition = self.peek_character() == Some(expected);

      if condition {
         self.offset += expected.len_utf8();
      }

      condition
   }

   fn consume_while(&mut self, predicate: impl Fn(char) -> bool) -> usize {
      let len: usize = self
         .remaining()
         .chars()
         .take_while(|&c| predicate(c))
         .map(char::len_utf8)
         .sum();

      self.offset += len;
      len
   }

   fn consume_string(&mut self) -> Kind {
      loop {
         match self.consume_character() {
            Some('"') => return TOKEN_STRING,

            Some('\\') => {
               // The escaped character belongs to the string whatever it is.
               self.consume_character();
            },

            Some(_) => {},

            None => return TOKEN_ERROR_UNTERMINATED_STRING,
         }
      }
   }

   fn consume_kind(&mut self) -> Option<Kind> {
      let start_offset = self.offset;

      Some(match self.consume_character()? {
         c if c.is_whitespace() || c == ',' => {
            self.consume_while(|c| c.is_whitespace() || c == ',');
            TOKEN_SPACE
         },

         ';' => {
            self.consume_while(|c| c != '\n');
            TOKEN_COMMENT
         },

         '(' => TOKEN_PARENTHESIS_LEFT,
         ')' => TOKEN_PARENTHESIS_RIGHT,
         '[' => TOKEN_BRACKET_LEFT,
         ']' => TOKEN_BRACKET_RIGHT,
         '{' => TOKEN_CURLYBRACE_LEFT,
         '}' => TOKEN_CURLYBRACE_RIGHT,

         '\'' => TOKEN_QUOTE,
         '`' => TOKEN_BACKTICK,
         '~' if self.try_consume_character('@') => TOKEN_TILDE_AT,
         '~' => TOKEN_TILDE,
         '@' => TOKEN_AT,
         '^' => TOKEN_CARET,

         '"' => self.consume_string(),

         initial => {
            self.consume_while(|c| !is_atom_terminator(c));

            let atom = &self.input[start_offset..self.offset];

            if is_integer(atom) {
               TOKEN_INTEGER
            } else if initial == ':' {
               TOKEN_KEYWORD
            } else {
               TOKEN_SYMBOL
            }
         },
      })
   }
}

#[cfg(test)]
mod tests {
   use proptest::prelude::*;

   use super::*;

   fn kinds(input: &str) -> Vec<(Kind, &str)> {
      tokenize(input)
         .filter(|&(kind, _)| !kind.is_trivia())
         .collect()
   }

   #[test]
   fn delimiters_and_atoms() {
      assert_eq!(
         kinds("(def! x [1 -2 :k]) ; trailing"),
         vec![
            (TOKEN_PARENTHESIS_LEFT, "("),
            (TOKEN_SYMBOL, "def!"),
            (TOKEN_SYMBOL, "x"),
            (TOKEN_BRACKET_LEFT, "["),
            (TOKEN_INTEGER, "1"),
            (TOKEN_INTEGER, "-2"),
            (TOKEN_KEYWORD, ":k"),
            (TOKEN_BRACKET_RIGHT, "]"),
            (TOKEN_PARENTHESIS_RIGHT, ")"),
         ],
      );
   }

   #[test]
   fn commas_are_whitespace() {
      assert_eq!(
         tokenize("1,,2").collect::<Vec<_>>(),
         vec![
            (TOKEN_INTEGER, "1"),
            (TOKEN_SPACE, ",,"),
            (TOKEN_INTEGER, "2"),
         ],
      );
   }

   #[test]
   fn reader_macros() {
      assert_eq!(
         kinds("'a `b ~c ~@d @e ^f"),
         vec![
            (TOKEN_QUOTE, "'"),
            (TOKEN_SYMBOL, "a"),
            (TOKEN_BACKTICK, "`"),
            (TOKEN_SYMBOL, "b"),
            (TOKEN_TILDE, "~"),
            (TOKEN_SYMBOL, "c"),
            (TOKEN_TILDE_AT, "~@"),
            (TOKEN_SYMBOL, "d"),
            (TOKEN_AT, "@"),
            (TOKEN_SYMBOL, "e"),
            (TOKEN_CARET, "^"),
            (TOKEN_SYMBOL, "f"),
         ],
      );
   }

   #[test]
   fn minus_alone_is_a_symbol() {
      assert_eq!(kinds("- -x"), vec![
         (TOKEN_SYMBOL, "-"),
         (TOKEN_SYMBOL, "-x")
      ]);
   }

   #[test]
   fn strings() {
      assert_eq!(kinds(r#""a \" b""#), vec![(TOKEN_STRING, r#""a \" b""#)]);
      assert_eq!(kinds(r#""\\""#), vec![(TOKEN_STRING, r#""\\""#)]);
      assert_eq!(kinds(r#""abc"#), vec![(
         TOKEN_ERROR_UNTERMINATED_STRING,
         r#""abc"#
      )]);
      assert_eq!(kinds(r#""abc\""#), vec![(
         TOKEN_ERROR_UNTERMINATED_STRING,
         r#""abc\""#
      )]);
   }

   proptest! {
      #[test]
      fn tokens_cover_input(input in any::<String>()) {
         let joined: String = tokenize(&input).map(|(_, slice)| slice).collect();

         prop_assert_eq!(joined, input);
      }

      #[test]
      fn tokens_are_never_empty(input in "[()\\[\\]{}'`~@^\" ;,a-z0-9:-]{0,64}") {
         for (_, slice) in tokenize(&input) {
            prop_assert!(!slice.is_empty());
         }
      }
   }
}
