//! Benchmark profiles for the IMSDL arena allocator.
//!
//! - [`vertex_profile`]: arena sized for 2D vertex positions
//! - [`cache_line_profile`]: one cache-line-aligned 64-byte slot per element
//! - [`fill`]: allocate until the arena reports full

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use imsdl_arena::{Arena, ArenaConfig};

/// Alignment used by the cache-line profile.
pub const CACHE_LINE: usize = 64;

/// Arena config for `capacity` 2D vertices (`[f32; 2]`), 16-byte aligned base.
pub fn vertex_profile(capacity: usize) -> ArenaConfig {
    ArenaConfig::new(capacity, std::mem::size_of::<[f32; 2]>(), 16)
}

/// Arena config for `capacity` 64-byte slots on cache-line boundaries.
pub fn cache_line_profile(capacity: usize) -> ArenaConfig {
    ArenaConfig::new(capacity, CACHE_LINE, CACHE_LINE)
}

/// Allocate every remaining slot, returning how many were handed out.
pub fn fill(arena: &mut Arena) -> usize {
    let mut count = 0;
    while arena.allocate().is_ok() {
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_profile_is_valid() {
        let config = vertex_profile(1024);
        assert_eq!(config.element_size, 8);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn fresh_single_slot_arena_takes_the_bump_path() {
        let mut arena = Arena::new(ArenaConfig::for_type::<u64>(1).uninit()).unwrap();
        assert_eq!(arena.allocate().unwrap(), arena.base());
        assert!(arena.allocate().is_err());
    }

    #[test]
    fn fill_exhausts_arena() {
        let mut arena = Arena::new(cache_line_profile(16)).unwrap();
        assert_eq!(fill(&mut arena), 16);
        assert!(arena.is_full());
        assert_eq!(fill(&mut arena), 0);
    }
}
