//! Fx-hashed collection aliases.
//!
//! Path and export-name lookups dominate the generator's hashing work. These
//! keys are never attacker controlled, so the `rustc-hash` Fx hasher is used
//! in place of the standard library's `SipHash`.
//!
//! # Examples
//!
//! ```
//! use barrelize_core::FxHashSet;
//!
//! let mut seen: FxHashSet<&str> = FxHashSet::default();
//! assert!(seen.insert("utils/date"));
//! assert!(!seen.insert("utils/date"));
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;
