use crate::{Instance, Reflect};
use crate::ops::ReflectError;

/// A key-value container with an optional comparison policy.
///
/// The policy of a hash map is its hasher state. Maps using the default
/// policy report no comparer; others expose it so it can be stored and
/// reinstalled.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the entries in the map's own order.
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    /// Inserts an entry, replacing the value of an equal key.
    fn insert(&mut self, key: Instance, value: Instance) -> Result<(), ReflectError>;

    /// The comparison policy, or `None` if it is the default one.
    fn comparer(&self) -> Option<&dyn Reflect>;

    /// Installs a comparison policy; the map must be empty.
    fn set_comparer(&mut self, comparer: Instance) -> Result<(), ReflectError>;
}
