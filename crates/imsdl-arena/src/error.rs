//! Error types for aligned allocation and arena operations.
//!
//! Split by subsystem: [`AlignError`] for the aligned allocation helper
//! and [`ArenaError`] for the bump arena. Every variant is recoverable by
//! the caller; nothing in this crate aborts the process on failure.

use std::error::Error;
use std::fmt;

/// Errors from the aligned allocation helper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlignError {
    /// The alignment is zero or not a power of two, or there is no
    /// address to align (null pointer).
    InvalidAlignment {
        /// The rejected alignment, in bytes.
        alignment: usize,
    },
    /// The global allocator could not satisfy the request, or the
    /// request has no valid layout (zero size, size overflow).
    AllocationFailed {
        /// Requested block size in bytes.
        size: usize,
        /// Effective alignment of the request in bytes.
        alignment: usize,
    },
    /// Rounding the address up would run past the end of the address space.
    AddressOverflow {
        /// The address being aligned.
        address: usize,
        /// The requested alignment in bytes.
        alignment: usize,
    },
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAlignment { alignment } => {
                write!(f, "invalid alignment {alignment}: must be a power of two")
            }
            Self::AllocationFailed { size, alignment } => {
                write!(
                    f,
                    "aligned allocation failed: size {size} bytes, alignment {alignment} bytes"
                )
            }
            Self::AddressOverflow { address, alignment } => {
                write!(
                    f,
                    "aligning address {address:#x} to {alignment} bytes overflows the address space"
                )
            }
        }
    }
}

impl Error for AlignError {}

/// Errors that can occur during arena creation and allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The requested capacity was zero.
    InvalidCapacity,
    /// The requested element size was zero.
    InvalidElementSize,
    /// The alignment is not a power of two, or is smaller than a pointer.
    InvalidAlignment {
        /// The rejected alignment, in bytes.
        alignment: usize,
    },
    /// The backing region could not be allocated.
    AllocationFailed {
        /// Size of the backing region in bytes (saturated on overflow).
        size: usize,
        /// Alignment of the backing region in bytes.
        alignment: usize,
    },
    /// Every slot has already been handed out.
    ArenaFull {
        /// Total number of slots in the arena.
        capacity: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity => write!(f, "invalid arena capacity: must be greater than 0"),
            Self::InvalidElementSize => {
                write!(f, "invalid element size: must be greater than 0")
            }
            Self::InvalidAlignment { alignment } => {
                write!(
                    f,
                    "invalid arena alignment {alignment}: must be a power of two and at least pointer-sized"
                )
            }
            Self::AllocationFailed { size, alignment } => {
                write!(
                    f,
                    "arena region allocation failed: size {size} bytes, alignment {alignment} bytes"
                )
            }
            Self::ArenaFull { capacity } => {
                write!(f, "arena full: all {capacity} slots allocated")
            }
        }
    }
}

impl Error for ArenaError {}
