//! Hash states used by reflected hash maps.
//!
//! A hash map's [`BuildHasher`] is its *comparison policy*. Maps built with
//! [`FixedHashState`] use the default policy; any other state is a custom
//! policy and is carried along when the map is serialized.

use core::hash::{BuildHasher, Hash, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x95EE04C4F326B271);

/// A hasher whose results only depend on the input.
pub type FixedHasher = FoldHasher<'static>;

crate::reflect_struct! {
    /// The default comparison policy of reflected hash maps.
    ///
    /// Based on `foldhash` with a fixed seed, so hashing is stable across runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::hash::BuildHasher;
    /// use vc_reflect::hash::FixedHashState;
    ///
    /// assert_eq!(FixedHashState.hash_one(3), FixedHashState.hash_one(3));
    /// ```
    #[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
    pub struct FixedHashState;
}

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// SeededHashState

crate::reflect_struct! {
    /// A `foldhash` state with a caller-chosen seed.
    ///
    /// This is a non-default comparison policy: a map using it records the seed
    /// next to its entries when serialized and is rebuilt with the same seed.
    #[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
    pub struct SeededHashState {
        pub seed: u64,
    }
}

impl SeededHashState {
    #[inline]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BuildHasher for SeededHashState {
    type Hasher = FixedHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        FixedState::with_seed(self.seed).build_hasher()
    }
}

// -----------------------------------------------------------------------------
// Aliases

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

/// Hashes a value with the default policy.
#[inline]
pub fn fixed_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FixedHashState.build_hasher();
    value.hash(&mut hasher);
    hasher.finish()
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{FixedHashState, SeededHashState, fixed_hash};
    use core::hash::BuildHasher;

    #[test]
    fn fixed_state_is_stable() {
        assert_eq!(fixed_hash("abc"), FixedHashState.hash_one("abc"));
    }

    #[test]
    fn seeds_change_results() {
        let a = SeededHashState::new(1).hash_one(42_u32);
        let b = SeededHashState::new(2).hash_one(42_u32);
        assert_ne!(a, b);
        assert_eq!(a, SeededHashState::new(1).hash_one(42_u32));
    }
}
