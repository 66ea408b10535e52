use mal_util::Dupe;

use crate::Value;

/// Rewrites a quasiquoted template into a form that builds it.
///
/// The result only uses `cons`, `concat`, `vec` and `quote`, so evaluating it
/// substitutes the unquoted holes and leaves the rest as written.
pub fn quasiquote(template: &Value) -> Value {
   match *template {
      Value::List(ref list, _) if list.first().is_some_and(|head| head.is_symbol("unquote")) => {
         unquoted("unquote", list.iter().nth(1))
      },

      Value::List(ref list, _) => expand_items(list.iter()),

      Value::Vector(ref vector, _) => Value::list([Value::symbol("vec"), expand_items(vector.iter())]),

      Value::Symbol(_) | Value::Map(..) => Value::list([Value::symbol("quote"), template.dupe()]),

      ref other => other.dupe(),
   }
}

fn unquoted(name: &str, form: Option<&Value>) -> Value {
   form.map_or_else(
      || Value::exception(format!("'{name}' expects 1 argument")),
      Dupe::dupe,
   )
}

/// Builds `(cons a (cons b ...))` from the items, splicing
/// `(splice-unquote x)` items in with `concat`.
fn expand_items<'a>(items: impl Iterator<Item = &'a Value>) -> Value {
   let items = items.collect::<Vec<_>>();

   items.into_iter().rev().fold(Value::list([]), |rest, item| {
      match *item {
         Value::List(ref list, _) if list.first().is_some_and(|head| head.is_symbol("splice-unquote")) => {
            Value::list([
               Value::symbol("concat"),
               unquoted("splice-unquote", list.iter().nth(1)),
               rest,
            ])
         },

         _ => Value::list([Value::symbol("cons"), quasiquote(item), rest]),
      }
   })
}
