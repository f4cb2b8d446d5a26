use core::fmt;
use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use itertools::Itertools;

use crate::{error::LispError, value::Value};

#[derive(Default)]
struct Frame {
    bindings: HashMap<String, Value>,
    // Back-link for lookups only; a frame never keeps its parent alive
    parent: Option<Weak<RefCell<Frame>>>,
}

impl Frame {
    fn parent(&self) -> Option<Rc<RefCell<Frame>>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }
}

/// A scope mapping symbol names to values it owns.
///
/// Lookups walk the parent chain outward. Values go in and come out as copies,
/// so nothing held by the caller ever aliases a binding.
///
/// `Clone` is a deep copy: the new environment gets its own copy of every
/// binding and the same parent link.
pub struct Environment(Rc<RefCell<Frame>>);

impl Environment {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Frame::default())))
    }

    /// Looks `name` up here, then in each parent in turn, returning a copy.
    pub fn get(&self, name: &str) -> Result<Value, LispError> {
        let frame = self.0.borrow();
        if let Some(value) = frame.bindings.get(name) {
            return Ok(value.clone());
        }
        match frame.parent() {
            Some(parent) => Self(parent).get(name),
            None => Err(LispError::UnboundSymbol(name.to_owned())),
        }
    }

    /// Binds `name` in this environment, replacing any previous binding.
    pub fn put(&self, name: &str, value: Value) {
        log::trace!("put {} = {}", name, value);
        self.0.borrow_mut().bindings.insert(name.to_owned(), value);
    }

    /// Binds `name` in the outermost environment of the chain.
    pub fn def(&self, name: &str, value: Value) {
        Self(self.root()).put(name, value)
    }

    fn root(&self) -> Rc<RefCell<Frame>> {
        let mut current = Rc::clone(&self.0);
        loop {
            let parent = current.borrow().parent();
            match parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    pub fn set_parent(&self, parent: &Environment) {
        self.0.borrow_mut().parent = Some(Rc::downgrade(&parent.0));
    }

    pub fn has_parent(&self) -> bool {
        self.0.borrow().parent().is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    /// Names bound directly in this environment, sorted.
    pub fn names(&self) -> Vec<String> {
        self.0.borrow().bindings.keys().cloned().sorted().collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().bindings.is_empty()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Environment {
    fn clone(&self) -> Self {
        let frame = self.0.borrow();
        Self(Rc::new(RefCell::new(Frame {
            bindings: frame.bindings.clone(),
            parent: frame.parent.clone(),
        })))
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.borrow().bindings == other.0.borrow().bindings
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0.borrow();
        f.debug_struct("Environment")
            .field("bindings", &frame.bindings.keys().sorted().collect_vec())
            .field("has_parent", &frame.parent().is_some())
            .finish()
    }
}
