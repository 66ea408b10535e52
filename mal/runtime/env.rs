use std::{
   cell::{
      Cell,
      RefCell,
   },
   rc::Rc,
};

use mal_util::{
   Dupe,
   OptionDupedExt as _,
   suffix::Rc as _,
};
use rustc_hash::FxHashMap;
use scopeguard::{
   ScopeGuard,
   guard,
};

use crate::{
   Config,
   Value,
   value::{
      Params,
      SString,
   },
};

type Frame = Rc<RefCell<FxHashMap<SString, Value>>>;

fn frame() -> Frame {
   RefCell::new(FxHashMap::default()).rc()
}

/// Process wide interpreter state shared by every [`Env`].
pub struct State {
   globals: Frame,
   depth:   Cell<usize>,
   config:  Config,
}

/// A chain of lexical frames ending at the global frame.
///
/// Cloning is cheap and the clone sees the same frames. Pushing a frame with
/// [`Env::child`] never affects the receiver, so closures can hold on to the
/// chain they were created in.
#[derive(Clone)]
pub struct Env {
   frames: rpds::List<Frame>,
   state:  Rc<State>,
}

impl Dupe for Env {}

impl Env {
   /// Creates an empty global environment.
   #[must_use]
   pub fn new(config: Config) -> Self {
      Self {
         frames: rpds::List::new(),
         state:  State {
            globals: frame(),
            depth: Cell::new(0),
            config,
         }
         .rc(),
      }
   }

   #[must_use]
   pub fn config(&self) -> &Config {
      &self.state.config
   }

   /// Returns the current number of nested evaluations.
   #[must_use]
   pub fn depth(&self) -> usize {
      self.state.depth.get()
   }

   /// Returns an environment with the same globals and no local frames.
   #[must_use]
   pub fn global(&self) -> Self {
      Self {
         frames: rpds::List::new(),
         state:  self.state.dupe(),
      }
   }

   /// Returns an environment with a fresh empty frame on top of this one.
   #[must_use]
   pub fn child(&self) -> Self {
      Self {
         frames: self.frames.push_front(frame()),
         state:  self.state.dupe(),
      }
   }

   fn innermost(&self) -> &Frame {
      self.frames.first().unwrap_or(&self.state.globals)
   }

   /// Binds the name in the innermost frame, overwriting any previous
   /// binding in that frame. Outer frames are never touched.
   pub fn define(&self, name: impl Into<SString>, value: Value) {
      self.innermost().borrow_mut().insert(name.into(), value);
   }

   /// Looks the name up, innermost frame first.
   #[must_use]
   pub fn lookup(&self, name: &SString) -> Option<Value> {
      self
         .frames
         .iter()
         .chain([&self.state.globals])
         .find_map(|frame| frame.borrow().get(name).duped())
   }

   /// Binds arguments to parameters in the innermost frame.
   ///
   /// Rest arguments are collected into a list. Passing fewer or more
   /// arguments than the parameters accept is an exception.
   pub fn bind(&self, params: &Params, arguments: &[Value]) -> Result<(), Value> {
      params.check_arity(arguments.len())?;

      let (positional, rest) = arguments.split_at(params.positional.len());

      for (name, value) in params.positional.iter().zip(positional) {
         self.define(name.dupe(), value.dupe());
      }

      if let Some(ref name) = params.rest {
         self.define(name.dupe(), Value::list(rest.iter().map(Dupe::dupe)));
      }

      Ok(())
   }

   /// Enters one level of evaluation. Returns `None` when the configured
   /// maximum depth is reached. The level is left when the guard drops.
   pub(crate) fn enter(&self) -> Option<ScopeGuard<Rc<State>, impl FnOnce(Rc<State>)>> {
      let state = &self.state;

      if state.depth.get() >= state.config.max_depth {
         return None;
      }

      state.depth.set(state.depth.get() + 1);

      Some(guard(state.dupe(), |state| {
         state.depth.set(state.depth.get() - 1);
      }))
   }
}
