//! Binding scopes
//!
//! A [`Scope`] is a handle to one frame in a chain of reference-counted
//! frames. Functions keep the handle of the scope they were defined in, so a
//! frame lives as long as the longest-lived function that captured it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

use super::context::{Context, Keyword, Keywords};
use super::value::Value;

struct Frame {
    bindings: IndexMap<Rc<str>, Value>,
    parent: Option<Scope>,
    /// Only set on root frames
    keywords: Option<Arc<Keywords>>,
}

/// Handle to a frame in the scope chain
#[derive(Clone)]
pub struct Scope(Rc<RefCell<Frame>>);

impl Scope {
    /// Root scope holding the context's values and keyword table
    pub fn root(context: &Context) -> Scope {
        let bindings = context
            .values()
            .iter()
            .map(|(name, value)| (Rc::from(name.as_str()), value.clone()))
            .collect();
        Scope(Rc::new(RefCell::new(Frame {
            bindings,
            parent: None,
            keywords: Some(context.keywords().clone()),
        })))
    }

    /// New empty frame whose parent is `self`
    pub fn child(&self) -> Scope {
        tracing::trace!(depth = self.depth() + 1, "push scope");
        Scope(Rc::new(RefCell::new(Frame {
            bindings: IndexMap::new(),
            parent: Some(self.clone()),
            keywords: None,
        })))
    }

    /// Bind `name` in this frame, replacing any binding of the same name here
    pub fn declare(&self, name: impl Into<Rc<str>>, value: Value) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Overwrite the nearest existing binding of `name`. Returns false when
    /// no frame in the chain binds it.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut current = self.clone();
        loop {
            let parent = {
                let mut frame = current.0.borrow_mut();
                if let Some(slot) = frame.bindings.get_mut(name) {
                    *slot = value;
                    return true;
                }
                frame.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Resolve `name` through the frame chain, then the root keyword table
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let parent = {
                let frame = current.0.borrow();
                if let Some(value) = frame.bindings.get(name) {
                    return Some(value.clone());
                }
                if frame.parent.is_none() {
                    return frame
                        .keywords
                        .as_ref()
                        .and_then(|keywords| keywords.get(name))
                        .map(|keyword| Value::Native(keyword.clone()));
                }
                frame.parent.clone()
            };
            current = parent?;
        }
    }

    /// Binding of `name` in this frame only
    pub fn lookup_local(&self, name: &str) -> Option<Value> {
        self.0.borrow().bindings.get(name).cloned()
    }

    /// Keyword registered at the root of this chain
    pub fn keyword(&self, name: &str) -> Option<Keyword> {
        let root = self.root_frame();
        let frame = root.0.borrow();
        frame
            .keywords
            .as_ref()
            .and_then(|keywords| keywords.get(name))
            .cloned()
    }

    fn root_frame(&self) -> Scope {
        let mut current = self.clone();
        loop {
            let parent = current.0.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Number of frames above this one
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.0.borrow().parent.clone();
        while let Some(scope) = current {
            depth += 1;
            current = scope.0.borrow().parent.clone();
        }
        depth
    }

    /// Bindings of this frame in declaration order
    pub fn bindings(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .bindings
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Whether both handles point at the same frame
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0.borrow();
        f.debug_struct("Scope")
            .field("depth", &self.depth())
            .field("names", &frame.bindings.keys().collect::<Vec<_>>())
            .finish()
    }
}
