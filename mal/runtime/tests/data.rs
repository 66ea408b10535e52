//! Runs every `.mal` file in `tests/data`.
//!
//! A line starting with `;=>` holds the expected printed value of the
//! source read since the previous expectation. Each file gets a fresh
//! environment.

use std::{
   fs,
   path::Path,
};

use mal_runtime::{
   Config,
   environment,
   rep,
};

fn check(path: &Path) -> Vec<String> {
   let source = fs::read_to_string(path).unwrap();
   let env = environment(Config::default());

   let mut failures = Vec::new();
   let mut pending = String::new();

   for (index, line) in source.lines().enumerate() {
      let Some(expected) = line.strip_prefix(";=>") else {
         pending.push_str(line);
         pending.push('\n');
         continue;
      };

      let actual = match rep(&pending, &env) {
         Ok(value) => value.to_string(),
         Err(error) => format!("ReadError: {error}"),
      };

      if actual != expected {
         failures.push(format!(
            "{path}:{line}:\n   source:   {source}\n   expected: {expected}\n   actual:   {actual}",
            path = path.display(),
            line = index + 1,
            source = pending.trim(),
         ));
      }

      pending.clear();
   }

   failures
}

#[test]
fn data() {
   let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data");

   let mut paths = fs::read_dir(&root)
      .unwrap()
      .map(|entry| entry.unwrap().path())
      .filter(|path| path.extension().is_some_and(|extension| extension == "mal"))
      .collect::<Vec<_>>();
   paths.sort();

   assert!(!paths.is_empty(), "no test data in {root}", root = root.display());

   let failures = paths.iter().flat_map(|path| check(path)).collect::<Vec<_>>();

   assert!(failures.is_empty(), "\n{failures}", failures = failures.join("\n"));
}
