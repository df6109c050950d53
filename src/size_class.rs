//! Size class table and lookup functions.
//!
//! Objects up to [`SIZECLASS_MAX`] words are bucketed into size classes. Each
//! class owns pools of [`POOL_WSIZE`] words carved into equal blocks. The
//! tables are generated by build.rs; nothing here computes at runtime beyond
//! an array index.

use crate::config::{POOL_AVAIL_WSIZE, POOL_HEADER_WSIZE, POOL_WSIZE, SIZECLASS_MAX};
use crate::generator::SizeClassTable;
pub use crate::generator::{INVALID_SIZECLASS, SizeClassIdx};
use alloc::vec::Vec;

include!(concat!(env!("OUT_DIR"), "/size_class_gen.rs"));

/// Bytes per word.
pub const WORD_SIZE: usize = core::mem::size_of::<usize>();

// Class indices must fit in `SizeClassIdx` with the sentinel left over.
const _: () = assert!(NUM_SIZECLASSES > 0 && NUM_SIZECLASSES <= INVALID_SIZECLASS as usize);

/// Information about a single size class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeClassInfo {
    /// Block size (words). Every object in this class is rounded up to it.
    pub wsize: usize,
    /// Padding words between the pool header and the first block.
    pub wastage: usize,
}

impl SizeClassInfo {
    pub const fn blocks_per_pool(&self) -> usize {
        POOL_AVAIL_WSIZE / self.wsize
    }

    pub const fn bytes(&self) -> usize {
        self.wsize * WORD_SIZE
    }
}

/// Map an object size in words to its size class index.
///
/// `wsize` must be in `1..=SIZECLASS_MAX`. Larger requests belong to the
/// large-object path; use [`try_class_of`] when that is not known.
#[inline]
pub fn class_of(wsize: usize) -> usize {
    debug_assert!(
        wsize >= 1 && wsize <= SIZECLASS_MAX,
        "wsize {} outside 1..={}",
        wsize,
        SIZECLASS_MAX
    );
    SIZECLASS_WSIZE[wsize] as usize
}

/// Like [`class_of`], but `None` for sizes no class serves.
#[inline]
pub fn try_class_of(wsize: usize) -> Option<usize> {
    if wsize == 0 || wsize > SIZECLASS_MAX {
        return None;
    }
    Some(SIZECLASS_WSIZE[wsize] as usize)
}

/// Block size (words) of a size class.
#[inline]
pub fn max_size_of(cls: usize) -> usize {
    WSIZE_SIZECLASS[cls] as usize
}

/// Padding words at the start of a pool of this class.
#[inline]
pub fn wastage_of(cls: usize) -> usize {
    WASTAGE_SIZECLASS[cls] as usize
}

#[inline]
pub fn class_info(cls: usize) -> SizeClassInfo {
    SizeClassInfo {
        wsize: max_size_of(cls),
        wastage: wastage_of(cls),
    }
}

/// Number of words needed to hold `bytes`.
#[inline]
pub const fn wsize_of_bytes(bytes: usize) -> usize {
    bytes.div_ceil(WORD_SIZE)
}

/// Map a byte size to its size class. Zero bytes uses the smallest class.
/// Returns `None` above `SIZECLASS_MAX` words.
#[inline]
pub fn class_of_bytes(bytes: usize) -> Option<usize> {
    if bytes == 0 {
        return Some(0);
    }
    try_class_of(wsize_of_bytes(bytes))
}

/// Copy the built-in tables into a [`SizeClassTable`].
pub fn table() -> SizeClassTable {
    SizeClassTable {
        pool_wsize: POOL_WSIZE,
        pool_header_wsize: POOL_HEADER_WSIZE,
        sizeclass_max: SIZECLASS_MAX,
        wsize_sizeclass: WSIZE_SIZECLASS.iter().map(|&w| w as usize).collect(),
        wastage_sizeclass: WASTAGE_SIZECLASS.iter().map(|&w| w as usize).collect(),
        sizeclass_wsize: Vec::from(SIZECLASS_WSIZE),
    }
}
