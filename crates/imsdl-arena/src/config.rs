//! Arena configuration parameters.

use std::mem;

use crate::align::{self, MIN_ALIGNMENT};
use crate::error::ArenaError;

/// Configuration for a fixed-slot arena.
///
/// Validated at construction; all values are immutable once the arena
/// exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Number of slots the arena can hand out. Must be greater than 0.
    pub capacity: usize,

    /// Size of each slot in bytes. Must be greater than 0.
    ///
    /// Slots are packed back to back, so only the first slot is
    /// guaranteed to sit on `alignment` unless `element_size` is itself
    /// a multiple of it.
    pub element_size: usize,

    /// Alignment of the region's base address in bytes.
    ///
    /// Must be a power of two and at least [`MIN_ALIGNMENT`].
    pub alignment: usize,

    /// Zero-fill the backing region at creation.
    ///
    /// Default: `true`.
    pub zero_init: bool,
}

impl ArenaConfig {
    /// Create a config with zero-initialised storage.
    pub fn new(capacity: usize, element_size: usize, alignment: usize) -> Self {
        Self {
            capacity,
            element_size,
            alignment,
            zero_init: true,
        }
    }

    /// Config for an arena of `capacity` slots, each sized and aligned
    /// for a `T`.
    pub fn for_type<T>(capacity: usize) -> Self {
        Self::new(
            capacity,
            mem::size_of::<T>(),
            mem::align_of::<T>().max(MIN_ALIGNMENT),
        )
    }

    /// Leave the backing region uninitialised.
    pub fn uninit(mut self) -> Self {
        self.zero_init = false;
        self
    }

    /// Size of the backing region in bytes, or `None` on overflow.
    pub fn region_bytes(&self) -> Option<usize> {
        self.capacity.checked_mul(self.element_size)
    }

    /// Check capacity, element size, alignment, then region size, in
    /// that order, reporting the first violation.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.capacity == 0 {
            return Err(ArenaError::InvalidCapacity);
        }
        if self.element_size == 0 {
            return Err(ArenaError::InvalidElementSize);
        }
        if !align::is_valid_alignment(self.alignment) {
            return Err(ArenaError::InvalidAlignment {
                alignment: self.alignment,
            });
        }
        if self.region_bytes().is_none() {
            return Err(ArenaError::AllocationFailed {
                size: usize::MAX,
                alignment: self.alignment,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_zero_init() {
        let config = ArenaConfig::new(4, 16, 16);
        assert!(config.zero_init);
        assert!(!config.uninit().zero_init);
    }

    #[test]
    fn for_type_uses_type_layout() {
        let config = ArenaConfig::for_type::<[f32; 4]>(8);
        assert_eq!(config.element_size, 16);
        assert_eq!(config.alignment, MIN_ALIGNMENT);

        #[allow(dead_code)]
        #[repr(align(64))]
        struct CacheLine([u8; 64]);
        let config = ArenaConfig::for_type::<CacheLine>(2);
        assert_eq!(config.element_size, 64);
        assert_eq!(config.alignment, 64);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn region_bytes_is_checked() {
        assert_eq!(ArenaConfig::new(4, 16, 16).region_bytes(), Some(64));
        assert_eq!(ArenaConfig::new(usize::MAX, 2, 16).region_bytes(), None);
    }

    #[test]
    fn validate_reports_first_violation_in_order() {
        assert_eq!(
            ArenaConfig::new(0, 0, 3).validate(),
            Err(ArenaError::InvalidCapacity)
        );
        assert_eq!(
            ArenaConfig::new(1, 0, 3).validate(),
            Err(ArenaError::InvalidElementSize)
        );
        assert_eq!(
            ArenaConfig::new(1, 1, 3).validate(),
            Err(ArenaError::InvalidAlignment { alignment: 3 })
        );
        assert_eq!(
            ArenaConfig::new(usize::MAX, 2, 16).validate(),
            Err(ArenaError::AllocationFailed {
                size: usize::MAX,
                alignment: 16
            })
        );
    }

    #[test]
    fn sub_pointer_alignment_is_rejected() {
        let config = ArenaConfig::new(4, 4, MIN_ALIGNMENT / 2);
        assert_eq!(
            config.validate(),
            Err(ArenaError::InvalidAlignment {
                alignment: MIN_ALIGNMENT / 2
            })
        );
    }
}
