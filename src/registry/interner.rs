use std::hash::BuildHasher;

use lasso::{Rodeo, RodeoReader, Spur};
use twox_hash::XxHash64;

/// Fixed-seed XxHash64 build-hasher, so hash maps behave identically across runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct StableHasher;

impl BuildHasher for StableHasher {
    type Hasher = XxHash64;
    fn build_hasher(&self) -> Self::Hasher {
        XxHash64::default()
    }
}

/// Read-only interner of canonical character ids.
pub type CharacterInterner = RodeoReader<Spur, StableHasher>;

/// Mutable interner used while a registry is being assembled.
pub(crate) type InternerBuilder = Rodeo<Spur, StableHasher>;

pub(crate) fn interner_builder() -> InternerBuilder {
    Rodeo::with_hasher(StableHasher)
}
