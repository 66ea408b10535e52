use std::fmt::{
   self,
   Write as _,
};

/// An escape sequence the language does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidEscape {
   /// The byte offset of the backslash.
   pub offset:    usize,
   /// The character after the backslash.
   pub character: char,
}

/// Unescapes the content of a string literal, without its quotes.
pub fn unescape(s: &str) -> Result<String, InvalidEscape> {
   let mut string = String::with_capacity(s.len());

   let mut chars = s.char_indices();
   while let Some((offset, c)) = chars.next() {
      if c != '\\' {
         string.push(c);
         continue;
      }

      // A trailing lone backslash cannot come out of the tokenizer.
      let Some((_, next)) = chars.next() else {
         return Err(InvalidEscape {
            offset,
            character: '\\',
         });
      };

      string.push(match next {
         'n' => '\n',
         '"' => '"',
         '\\' => '\\',

         character => return Err(InvalidEscape { offset, character }),
      });
   }

   Ok(string)
}

/// Writes the string with backslashes, quotes and newlines escaped.
/// Surrounding quotes are not written.
pub fn escape(writer: &mut impl fmt::Write, s: &str) -> fmt::Result {
   for c in s.chars() {
      match c {
         '\\' => writer.write_str("\\\\")?,
         '"' => writer.write_str("\\\"")?,
         '\n' => writer.write_str("\\n")?,
         c => writer.write_char(c)?,
      }
   }

   Ok(())
}
