//! The path stack shared by the encoder and the decoder.
//!
//! Each [`Frame`] is one step from the root to the node being processed. It
//! holds the fragment the step adds to the node's path (`root`, `.name`,
//! `[3]`, or nothing for an envelope payload) and a single-shot closure that
//! stores the node's value in its parent.
//!
//! The closures write through sinks ([`Slot`], [`Gather`]) owned by the
//! parent, so a child can be stored before the parent is complete.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use thiserror::Error;

// -----------------------------------------------------------------------------
// PathError

/// A misuse of the path stack. Always an internal error of the walker.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathError {
    #[error("the frame at `{path}` already holds a value")]
    AlreadyCommitted { path: String },

    #[error("the frame at `{path}` was left without a value")]
    Uncommitted { path: String },

    #[error("the path stack is empty")]
    EmptyStack,
}

// -----------------------------------------------------------------------------
// Frame

/// One step of the path stack.
pub struct Frame<V> {
    fragment: String,
    commit: Option<Box<dyn FnOnce(V)>>,
}

impl<V> Frame<V> {
    #[inline]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Returns `true` once the frame's value has been stored.
    #[inline]
    pub fn is_committed(&self) -> bool {
        self.commit.is_none()
    }
}

// -----------------------------------------------------------------------------
// PathStack

/// A stack of [`Frame`]s.
///
/// # Examples
///
/// ```
/// use vc_json::path::{PathStack, Slot};
///
/// let root = Slot::new();
/// let mut stack = PathStack::new();
/// stack.push("root", root.setter());
/// stack.push(".name", |_: i32| {});
/// assert_eq!(stack.current_path(), "root.name");
///
/// stack.commit(1).unwrap();
/// assert!(stack.commit(2).is_err());
/// stack.pop().unwrap();
///
/// stack.commit(7).unwrap();
/// stack.pop().unwrap();
/// assert_eq!(root.take(), Some(7));
/// ```
pub struct PathStack<V> {
    frames: Vec<Frame<V>>,
}

impl<V> Default for PathStack<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PathStack<V> {
    #[inline]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, fragment: impl Into<String>, commit: impl FnOnce(V) + 'static) {
        self.frames.push(Frame {
            fragment: fragment.into(),
            commit: Some(Box::new(commit)),
        });
    }

    /// Removes the top frame, committed or not.
    pub fn pop(&mut self) -> Result<Frame<V>, PathError> {
        self.frames.pop().ok_or(PathError::EmptyStack)
    }

    /// The fragments of all frames, root first.
    #[inline]
    pub fn current_path(&self) -> String {
        self.path_to(self.frames.len())
    }

    /// Stores `value` through the top frame; a frame accepts one value only.
    pub fn commit(&mut self, value: V) -> Result<(), PathError> {
        let frame = self.frames.last_mut().ok_or(PathError::EmptyStack)?;
        match frame.commit.take() {
            Some(commit) => {
                commit(value);
                Ok(())
            }
            None => Err(PathError::AlreadyCommitted {
                path: self.current_path(),
            }),
        }
    }

    /// Returns `true` if the top frame has stored its value.
    pub fn is_committed(&self) -> bool {
        self.frames.last().is_some_and(Frame::is_committed)
    }

    /// Pushes a frame and returns the depth to [`leave`](Self::leave) at.
    #[inline]
    pub fn enter(&mut self, fragment: impl Into<String>, commit: impl FnOnce(V) + 'static) -> usize {
        let depth = self.frames.len();
        self.push(fragment, commit);
        depth
    }

    /// Pops the frame pushed at `depth` and every frame above it.
    ///
    /// Fails if the frame at `depth` was left without a value.
    pub fn leave(&mut self, depth: usize) -> Result<(), PathError> {
        let frame = self.frames.get(depth).ok_or(PathError::EmptyStack)?;
        let result = if frame.is_committed() {
            Ok(())
        } else {
            Err(PathError::Uncommitted {
                path: self.path_to(depth + 1),
            })
        };
        self.frames.truncate(depth);
        result
    }

    /// Pushes a frame, runs `f`, then pops the frame.
    ///
    /// When `f` succeeds the frame must have been committed. When it fails
    /// its error is returned and the frames it left are dropped.
    pub fn scoped<R, E: From<PathError>>(
        &mut self,
        fragment: impl Into<String>,
        commit: impl FnOnce(V) + 'static,
        f: impl FnOnce(&mut Self) -> Result<R, E>,
    ) -> Result<R, E> {
        let depth = self.enter(fragment, commit);
        let result = f(self);
        let left = self.leave(depth);
        let value = result?;
        left?;
        Ok(value)
    }

    fn path_to(&self, depth: usize) -> String {
        let mut path = String::new();
        for frame in &self.frames[..depth.min(self.frames.len())] {
            path.push_str(&frame.fragment);
        }
        path
    }
}

// -----------------------------------------------------------------------------
// Slot

/// A sink holding at most one value.
pub struct Slot<V>(Rc<RefCell<Option<V>>>);

impl<V: 'static> Slot<V> {
    #[inline]
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    /// A commit closure storing into this slot.
    pub fn setter(&self) -> impl FnOnce(V) + 'static {
        let cell = Rc::clone(&self.0);
        move |value| {
            *cell.borrow_mut() = Some(value);
        }
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.borrow().is_some()
    }

    #[inline]
    pub fn take(&self) -> Option<V> {
        self.0.borrow_mut().take()
    }
}

impl<V: 'static> Default for Slot<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Gather

/// A sink collecting values in commit order.
pub struct Gather<V>(Rc<RefCell<Vec<V>>>);

impl<V: 'static> Gather<V> {
    #[inline]
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Vec::new())))
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Rc::new(RefCell::new(Vec::with_capacity(capacity))))
    }

    /// A commit closure appending to this sink.
    pub fn pusher(&self) -> impl FnOnce(V) + 'static {
        let cell = Rc::clone(&self.0);
        move |value| cell.borrow_mut().push(value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Takes every value collected so far.
    #[inline]
    pub fn take(&self) -> Vec<V> {
        mem::take(&mut *self.0.borrow_mut())
    }
}

impl<V: 'static> Default for Gather<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Gather, PathError, PathStack, Slot};

    #[test]
    fn path_concatenates_fragments() {
        let mut stack = PathStack::<u8>::new();
        stack.push("root", |_| {});
        stack.push(".items", |_| {});
        stack.push("", |_| {});
        stack.push("[2]", |_| {});
        assert_eq!(stack.current_path(), "root.items[2]");
        assert_eq!(stack.depth(), 4);
    }

    #[test]
    fn commit_is_single_shot() {
        let slot = Slot::new();
        let mut stack = PathStack::new();
        stack.push("root", slot.setter());
        assert!(!stack.is_committed());
        stack.commit(1_u8).unwrap();
        assert!(stack.is_committed());
        assert_eq!(
            stack.commit(2),
            Err(PathError::AlreadyCommitted { path: "root".into() })
        );
        assert_eq!(slot.take(), Some(1));
    }

    #[test]
    fn empty_stack_errors() {
        let mut stack = PathStack::<u8>::new();
        assert_eq!(stack.commit(1), Err(PathError::EmptyStack));
        assert!(stack.pop().is_err());
    }

    #[test]
    fn scoped_requires_a_commit() {
        let gather = Gather::new();
        let mut stack = PathStack::new();

        let ok: Result<(), PathError> = stack.scoped("[0]", gather.pusher(), |s| s.commit(5_i32));
        assert!(ok.is_ok());

        let missing: Result<(), PathError> = stack.scoped("[1]", gather.pusher(), |_| Ok(()));
        assert_eq!(missing, Err(PathError::Uncommitted { path: "[1]".into() }));

        assert_eq!(stack.depth(), 0);
        assert_eq!(gather.take(), vec![5]);
        assert!(gather.is_empty());
    }

    #[test]
    fn scoped_pops_on_error() {
        let mut stack = PathStack::<u8>::new();
        stack.push("root", |_| {});
        let result: Result<(), PathError> = stack.scoped(".a", |_| {}, |s| {
            s.push(".b", |_| {});
            Err(PathError::EmptyStack)
        });
        assert!(result.is_err());
        assert_eq!(stack.current_path(), "root");
    }
}
