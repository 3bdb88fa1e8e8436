//! Fixed-slot bump arena over a single aligned region.
//!
//! An [`Arena`] owns one [`AlignedBlock`] sized for `capacity` slots of
//! `element_size` bytes. [`Arena::allocate`] hands out the next slot by
//! advancing a cursor; slots are never freed individually. The whole
//! region is released at once by [`Arena::destroy`] (or drop).

use std::ptr::NonNull;

use crate::align::{self, AlignedBlock};
use crate::config::ArenaConfig;
use crate::error::ArenaError;

/// A fixed-capacity bump allocator handing out equally sized slots.
///
/// Slot `i` lives at `base + i * element_size`. The region never moves or
/// grows, so slot addresses stay valid until the arena is destroyed. The
/// addresses are non-owning: the arena keeps exclusive ownership of the
/// region and releases it exactly once.
///
/// `Arena` is `Send` but not `Sync`. Sharing one arena between threads
/// requires external serialisation; [`Arena::allocate`] takes `&mut self`
/// so safe code cannot race on the cursor.
#[derive(Debug)]
pub struct Arena {
    /// Backing storage, allocated to full size at creation.
    region: AlignedBlock,
    element_size: usize,
    capacity: usize,
    /// Bump cursor: number of slots handed out so far.
    size: usize,
}

impl Arena {
    /// Create an arena from a validated [`ArenaConfig`].
    ///
    /// All precondition checks run before any memory is touched, so a
    /// failed call allocates nothing.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        if let Err(err) = config.validate() {
            log::error!("arena: rejected config {config:?}: {err}");
            return Err(err);
        }

        // Overflow was ruled out by `validate`.
        let bytes = config.capacity * config.element_size;
        let region = if config.zero_init {
            align::aligned_alloc_zeroed(bytes, config.alignment)
        } else {
            align::aligned_alloc(bytes, config.alignment)
        }
        .map_err(|err| {
            log::error!("arena: failed to allocate {bytes}-byte region: {err}");
            ArenaError::AllocationFailed {
                size: bytes,
                alignment: config.alignment,
            }
        })?;

        log::debug!(
            "arena: created {} slots x {} bytes at {:p} (alignment {})",
            config.capacity,
            config.element_size,
            region.as_ptr(),
            region.alignment(),
        );

        Ok(Self {
            region,
            element_size: config.element_size,
            capacity: config.capacity,
            size: 0,
        })
    }

    /// Shorthand for [`Arena::new`] with a zero-initialised region.
    pub fn create(
        capacity: usize,
        element_size: usize,
        alignment: usize,
    ) -> Result<Self, ArenaError> {
        Self::new(ArenaConfig::new(capacity, element_size, alignment))
    }

    /// Hand out the next slot.
    ///
    /// Returns the slot's address and advances the cursor by one. Fails
    /// with [`ArenaError::ArenaFull`] once every slot is taken, leaving
    /// the arena unchanged.
    pub fn allocate(&mut self) -> Result<NonNull<u8>, ArenaError> {
        let full = ArenaError::ArenaFull {
            capacity: self.capacity,
        };
        if self.size == self.capacity {
            log::error!(
                "arena: full, all {} slots of {} bytes in use",
                self.capacity,
                self.element_size
            );
            return Err(full);
        }
        // `size < capacity`, so the offset is inside the region.
        let slot = self
            .region
            .offset_ptr(self.size * self.element_size)
            .ok_or(full)?;
        self.size += 1;
        log::trace!("arena: slot {} at {:p}", self.size - 1, slot);
        Ok(slot)
    }

    /// Release the backing region.
    ///
    /// Consuming `self` means a destroyed arena cannot be used again. For
    /// call sites holding an optional arena, see [`release`].
    pub fn destroy(self) {
        let Self {
            region,
            capacity,
            size,
            ..
        } = self;
        log::debug!(
            "arena: destroying region at {:p} ({size}/{capacity} slots used)",
            region.as_ptr()
        );
        align::aligned_free(Some(region));
    }

    /// Address of an already handed-out slot, or `None` if `index` has
    /// not been allocated yet.
    pub fn slot(&self, index: usize) -> Option<NonNull<u8>> {
        if index >= self.size {
            return None;
        }
        self.region.offset_ptr(index * self.element_size)
    }

    /// Iterate over the addresses of all handed-out slots, in order.
    pub fn slots(&self) -> impl Iterator<Item = NonNull<u8>> + '_ {
        (0..self.size).filter_map(move |i| self.slot(i))
    }

    /// Whether `ptr` points into a slot that has been handed out.
    pub fn contains(&self, ptr: *const u8) -> bool {
        self.region.contains(ptr)
            && (ptr as usize - self.region.address()) < self.size * self.element_size
    }

    /// Base address of the region (the first slot).
    pub fn base(&self) -> NonNull<u8> {
        self.region.as_ptr()
    }

    /// Number of slots handed out.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether no slot has been handed out yet.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Whether every slot has been handed out.
    pub fn is_full(&self) -> bool {
        self.size == self.capacity
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots still available.
    pub fn remaining(&self) -> usize {
        self.capacity - self.size
    }

    /// Size of each slot in bytes.
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Alignment of the base address in bytes.
    pub fn alignment(&self) -> usize {
        self.region.alignment()
    }

    /// Size of the backing region in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.region.len()
    }
}

/// Destroy the arena held in `slot`, if any.
///
/// Leaves `None` behind, so repeated calls are no-ops.
pub fn release(slot: &mut Option<Arena>) {
    if let Some(arena) = slot.take() {
        arena.destroy();
    }
}
