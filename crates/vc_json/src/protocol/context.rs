use std::any::Any;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Where a serialized graph comes from or goes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ContextStates: u8 {
        /// Another process on the same machine.
        const CROSS_PROCESS = 1 << 0;
        /// Another machine.
        const CROSS_MACHINE = 1 << 1;
        const FILE          = 1 << 2;
        /// A store outlasting the process, e.g. a database.
        const PERSISTENCE   = 1 << 3;
        const REMOTING      = 1 << 4;
        const OTHER         = 1 << 5;
        /// An in-memory copy of the graph.
        const CLONE         = 1 << 6;
        const ALL           = 0x7F;
    }
}

impl Default for ContextStates {
    #[inline]
    fn default() -> Self {
        Self::ALL
    }
}

/// The context handed to custom protocols and surrogate selectors.
///
/// `additional` carries caller data; participants downcast it.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use vc_json::{ContextStates, StreamingContext};
///
/// let ctx = StreamingContext::new(ContextStates::FILE).with_additional(Rc::new(7_u32));
/// assert!(ctx.states().contains(ContextStates::FILE));
/// assert_eq!(ctx.additional::<u32>(), Some(&7));
/// ```
#[derive(Clone, Default)]
pub struct StreamingContext {
    states: ContextStates,
    additional: Option<Rc<dyn Any>>,
}

impl StreamingContext {
    #[inline]
    pub fn new(states: ContextStates) -> Self {
        Self {
            states,
            additional: None,
        }
    }

    #[inline]
    pub fn with_additional(mut self, additional: Rc<dyn Any>) -> Self {
        self.additional = Some(additional);
        self
    }

    #[inline]
    pub fn states(&self) -> ContextStates {
        self.states
    }

    /// The caller data, if it is a `T`.
    #[inline]
    pub fn additional<T: Any>(&self) -> Option<&T> {
        self.additional.as_deref()?.downcast_ref()
    }
}

impl fmt::Debug for StreamingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingContext")
            .field("states", &self.states)
            .field("additional", &self.additional.is_some())
            .finish()
    }
}
