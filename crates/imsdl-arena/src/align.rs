//! Aligned heap allocation and address rounding.
//!
//! [`aligned_alloc`] hands out an [`AlignedBlock`]: an owning handle over a
//! block whose base address is a multiple of the requested alignment. The
//! block remembers the exact [`Layout`] it was allocated with and releases
//! itself through the global allocator on drop, so allocation and release
//! can never be mismatched.
//!
//! This is the only module in the crate that may contain `unsafe` code.
//! Every unsafe block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::fmt;
use std::mem;
use std::ptr::NonNull;

use crate::error::AlignError;

/// Smallest alignment ever used for a block: the size of a native pointer.
pub const MIN_ALIGNMENT: usize = mem::size_of::<*const u8>();

/// Returns `true` if `alignment` is a power of two and at least
/// [`MIN_ALIGNMENT`].
pub fn is_valid_alignment(alignment: usize) -> bool {
    alignment >= MIN_ALIGNMENT && alignment.is_power_of_two()
}

/// An owned, aligned heap block.
///
/// The block is released exactly once, when the handle is dropped (or
/// passed to [`aligned_free`]). Its contents are plain bytes; callers that
/// need uninitialised reads to be meaningful should allocate with
/// [`aligned_alloc_zeroed`].
pub struct AlignedBlock {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: the block uniquely owns its allocation (like `Box<[u8]>`) and
// holds no thread-local or shared state, so moving it across threads is
// sound. It is deliberately not `Sync`.
unsafe impl Send for AlignedBlock {}

impl AlignedBlock {
    /// Base address of the block.
    pub fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Base address as an integer.
    pub fn address(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// Size of the block in bytes.
    pub fn len(&self) -> usize {
        self.layout.size()
    }

    /// Whether the block has zero length. Provided alongside [`len`](Self::len);
    /// allocation rejects zero sizes, so a live block is never empty.
    pub fn is_empty(&self) -> bool {
        self.layout.size() == 0
    }

    /// Alignment of the base address in bytes.
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    /// Whether `ptr` points inside this block.
    pub fn contains(&self, ptr: *const u8) -> bool {
        let addr = ptr as usize;
        let base = self.address();
        addr >= base && addr - base < self.len()
    }

    /// Address of the byte at `offset` from the base, or `None` if
    /// `offset` is past the end of the block.
    pub fn offset_ptr(&self, offset: usize) -> Option<NonNull<u8>> {
        if offset >= self.len() {
            return None;
        }
        // SAFETY: `offset < len`, so the result stays inside the allocation
        // and cannot wrap or become null.
        Some(unsafe { self.ptr.add(offset) })
    }
}

impl Drop for AlignedBlock {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from `alloc`/`alloc_zeroed` with exactly
        // `self.layout`, and drop runs once per owned block.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl fmt::Debug for AlignedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBlock")
            .field("ptr", &self.ptr)
            .field("len", &self.len())
            .field("alignment", &self.alignment())
            .finish()
    }
}

/// Allocate `size` bytes aligned to `alignment`.
///
/// Alignments smaller than [`MIN_ALIGNMENT`] are raised to it. After that
/// adjustment a non-power-of-two alignment fails with
/// [`AlignError::InvalidAlignment`] and nothing is allocated. A zero `size`,
/// a size the layout rules reject, or a null return from the global
/// allocator all fail with [`AlignError::AllocationFailed`].
///
/// The block's contents are uninitialised.
pub fn aligned_alloc(size: usize, alignment: usize) -> Result<AlignedBlock, AlignError> {
    allocate(size, alignment, false)
}

/// Like [`aligned_alloc`], but the returned block is zero-filled.
pub fn aligned_alloc_zeroed(size: usize, alignment: usize) -> Result<AlignedBlock, AlignError> {
    allocate(size, alignment, true)
}

/// Release a block obtained from [`aligned_alloc`].
///
/// `None` is a no-op. Dropping the block has the same effect; this exists
/// for call sites that hold an optional block.
pub fn aligned_free(block: Option<AlignedBlock>) {
    if let Some(block) = block {
        log::trace!(
            "aligned_free: releasing {} bytes at {:p}",
            block.len(),
            block.ptr
        );
        drop(block);
    }
}

fn allocate(size: usize, alignment: usize, zeroed: bool) -> Result<AlignedBlock, AlignError> {
    let alignment = alignment.max(MIN_ALIGNMENT);
    if !alignment.is_power_of_two() {
        log::error!("aligned_alloc: alignment {alignment} is not a power of 2");
        return Err(AlignError::InvalidAlignment { alignment });
    }

    let failed = || {
        log::error!("aligned_alloc: allocation failed (alignment={alignment}, size={size})");
        AlignError::AllocationFailed { size, alignment }
    };

    // The global allocator has undefined behaviour for zero-sized layouts.
    if size == 0 {
        return Err(failed());
    }
    let layout = Layout::from_size_align(size, alignment).map_err(|_| failed())?;

    // SAFETY: `layout` has a non-zero size (checked above).
    let raw = unsafe {
        if zeroed {
            alloc::alloc_zeroed(layout)
        } else {
            alloc::alloc(layout)
        }
    };
    let ptr = NonNull::new(raw).ok_or_else(failed)?;

    Ok(AlignedBlock { ptr, layout })
}

/// Round `address` up to the next multiple of `alignment`.
///
/// Returns `address` unchanged if it is already aligned. Fails with
/// [`AlignError::InvalidAlignment`] if `alignment` is zero or not a power
/// of two, and with [`AlignError::AddressOverflow`] if the rounded address
/// does not fit in a `usize`.
pub fn align_up(address: usize, alignment: usize) -> Result<usize, AlignError> {
    if !alignment.is_power_of_two() {
        log::error!("align_up: invalid alignment {alignment}, must be a power of 2");
        return Err(AlignError::InvalidAlignment { alignment });
    }
    let rem = address & (alignment - 1);
    if rem == 0 {
        return Ok(address);
    }
    address.checked_add(alignment - rem).ok_or_else(|| {
        log::error!("align_up: aligning {address:#x} to {alignment} overflows");
        AlignError::AddressOverflow { address, alignment }
    })
}

/// Pointer form of [`align_up`].
///
/// A null `ptr` yields no result: it fails with
/// [`AlignError::InvalidAlignment`], like a bad alignment. The returned pointer
/// is derived from `ptr` and is only dereferenceable if the rounded address
/// still lies inside the allocation `ptr` points into.
pub fn align_ptr_up(ptr: *const u8, alignment: usize) -> Result<NonNull<u8>, AlignError> {
    if ptr.is_null() {
        log::error!("align_ptr_up: cannot align a null pointer");
        return Err(AlignError::InvalidAlignment { alignment });
    }
    let address = ptr as usize;
    let aligned = align_up(address, alignment)?;
    let shifted = ptr.wrapping_add(aligned - address).cast_mut();
    // Non-null: `aligned >= address > 0` and no overflow occurred.
    NonNull::new(shifted).ok_or(AlignError::InvalidAlignment { alignment })
}
