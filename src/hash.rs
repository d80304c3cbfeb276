use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn stable_hash_with(f: impl FnOnce(&mut DefaultHasher)) -> u64 {
    let mut hasher = DefaultHasher::new();
    f(&mut hasher);
    hasher.finish()
}

/// Content hash used as a sample id when the source row carries none.
pub fn content_hash(parts: &[&str]) -> u64 {
    stable_hash_with(|hasher| {
        for part in parts {
            part.hash(hasher);
        }
    })
}
