use std::any::TypeId;

use vc_reflect::Reflect;
use vc_reflect::hash::HashMap;
use vc_reflect::info::{TypeInfo, Typed};

use crate::protocol::{ContextStates, ProtocolError, SerializationBag, StreamingContext};

// -----------------------------------------------------------------------------
// Surrogate

/// Writes and reads objects of a type it does not own as a bag.
///
/// Selected through a [`SurrogateSelector`], a surrogate takes precedence
/// over the type's own [`SerializeBag`](crate::SerializeBag).
pub trait Surrogate {
    fn produce_bag(
        &self,
        value: &dyn Reflect,
        bag: &mut SerializationBag,
        ctx: &StreamingContext,
    ) -> Result<(), ProtocolError>;

    /// Fills `value`, a default-constructed object, from the bag.
    fn absorb_bag(
        &self,
        value: &mut dyn Reflect,
        bag: &mut SerializationBag,
        ctx: &StreamingContext,
    ) -> Result<(), ProtocolError>;
}

/// Chooses the surrogate of a type, if it has one.
pub trait SurrogateSelector {
    fn get_surrogate(&self, info: &'static TypeInfo, ctx: &StreamingContext)
    -> Option<&dyn Surrogate>;
}

// -----------------------------------------------------------------------------
// SurrogateTable

struct Entry {
    states: ContextStates,
    surrogate: Box<dyn Surrogate>,
}

/// A [`SurrogateSelector`] keyed by type.
///
/// A surrogate applies when the context shares a state with the states it
/// was added for. Types without a matching entry are passed to the next
/// selector of the chain.
///
/// # Examples
///
/// ```
/// use vc_json::{ContextStates, StreamingContext, SurrogateSelector, SurrogateTable};
/// # use vc_json::{ProtocolError, SerializationBag, Surrogate};
/// # use vc_reflect::Reflect;
/// # struct Hex;
/// # impl Surrogate for Hex {
/// #     fn produce_bag(&self, _: &dyn Reflect, _: &mut SerializationBag, _: &StreamingContext)
/// #         -> Result<(), ProtocolError> { Ok(()) }
/// #     fn absorb_bag(&self, _: &mut dyn Reflect, _: &mut SerializationBag, _: &StreamingContext)
/// #         -> Result<(), ProtocolError> { Ok(()) }
/// # }
/// use vc_reflect::info::Typed;
///
/// let table = SurrogateTable::new().with::<u32>(ContextStates::FILE, Hex);
///
/// let file = StreamingContext::new(ContextStates::FILE);
/// let clone = StreamingContext::new(ContextStates::CLONE);
/// assert!(table.get_surrogate(u32::type_info(), &file).is_some());
/// assert!(table.get_surrogate(u32::type_info(), &clone).is_none());
/// assert!(table.get_surrogate(u8::type_info(), &file).is_none());
/// ```
#[derive(Default)]
pub struct SurrogateTable {
    entries: HashMap<TypeId, Entry>,
    next: Option<Box<dyn SurrogateSelector>>,
}

impl SurrogateTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the surrogate of `T`, replacing the previous one.
    pub fn add<T: Typed>(&mut self, states: ContextStates, surrogate: impl Surrogate + 'static) {
        self.entries.insert(
            T::type_info().type_id(),
            Entry {
                states,
                surrogate: Box::new(surrogate),
            },
        );
    }

    #[inline]
    pub fn with<T: Typed>(mut self, states: ContextStates, surrogate: impl Surrogate + 'static) -> Self {
        self.add::<T>(states, surrogate);
        self
    }

    /// Asks `next` for types this table has no surrogate for.
    #[inline]
    pub fn chain(mut self, next: impl SurrogateSelector + 'static) -> Self {
        self.next = Some(Box::new(next));
        self
    }
}

impl SurrogateSelector for SurrogateTable {
    fn get_surrogate(
        &self,
        info: &'static TypeInfo,
        ctx: &StreamingContext,
    ) -> Option<&dyn Surrogate> {
        match self.entries.get(&info.type_id()) {
            Some(entry) if entry.states.intersects(ctx.states()) => Some(&*entry.surrogate),
            _ => self.next.as_deref()?.get_surrogate(info, ctx),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
