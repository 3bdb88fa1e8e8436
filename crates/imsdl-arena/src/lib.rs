//! Aligned allocation and fixed-slot bump arenas for IMSDL.
//!
//! Two pieces, layered:
//!
//! ```text
//! Arena (fixed capacity, fixed slot size, bump cursor)
//! └── AlignedBlock (owned region, base aligned to a power of two)
//!     └── global allocator via `Layout`
//! ```
//!
//! - [`align`]: allocate and free blocks whose base address honours a
//!   power-of-two alignment, and round addresses up to an alignment.
//! - [`Arena`]: preallocates one aligned region and hands out slots by
//!   advancing a cursor. Slots are never freed individually; the region
//!   is released as a unit.
//!
//! Failures are returned as [`AlignError`] / [`ArenaError`] and logged
//! through the [`log`] facade. Nothing here installs a logger.
//!
//! # Threading
//!
//! Everything is single-threaded. An arena may be moved to another thread
//! (one arena per thread), but never shared without external locking.
//!
//! # Unsafe code
//!
//! `unsafe` is denied crate-wide except in [`align`], which owns every raw
//! allocation and pointer offset.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod align;
pub mod arena;
pub mod config;
pub mod error;

// Public re-exports for the primary API surface.
pub use align::{
    align_ptr_up, align_up, aligned_alloc, aligned_alloc_zeroed, aligned_free, AlignedBlock,
    MIN_ALIGNMENT,
};
pub use arena::{release, Arena};
pub use config::ArenaConfig;
pub use error::{AlignError, ArenaError};
