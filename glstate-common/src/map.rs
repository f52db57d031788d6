/// Fast optimized hash set type for small sets.
pub type FastHashSet<T> = rustc_hash::FxHashSet<T>;
