//! Pool layout for a size class.
//!
//! A pool of class `c` is laid out as:
//!
//! ```text
//! | header (POOL_HEADER_WSIZE) | padding (wastage_of(c)) | block 0 | block 1 | ... |
//! ```
//!
//! where every block is `max_size_of(c)` words and the blocks end exactly at
//! `POOL_WSIZE`.

use crate::config::{POOL_HEADER_WSIZE, POOL_WSIZE};
use crate::size_class;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolLayout {
    /// Size class index this layout belongs to.
    pub sizeclass: usize,
    pub header_wsize: usize,
    pub wastage_wsize: usize,
    /// Words per block.
    pub block_wsize: usize,
    /// Number of blocks carved from the pool.
    pub num_blocks: usize,
}

impl PoolLayout {
    /// Layout of a pool of class `cls`. Panics if `cls` is not a valid class.
    pub fn for_class(cls: usize) -> Self {
        let info = size_class::class_info(cls);
        Self {
            sizeclass: cls,
            header_wsize: POOL_HEADER_WSIZE,
            wastage_wsize: info.wastage,
            block_wsize: info.wsize,
            num_blocks: info.blocks_per_pool(),
        }
    }

    /// Word offset of block 0 from the start of the pool.
    pub const fn first_block_offset(&self) -> usize {
        self.header_wsize + self.wastage_wsize
    }

    /// Word offset of block `index` from the start of the pool.
    #[inline]
    pub fn block_offset(&self, index: usize) -> usize {
        assert!(
            index < self.num_blocks,
            "block {} out of range (pool holds {})",
            index,
            self.num_blocks
        );
        self.first_block_offset() + index * self.block_wsize
    }

    /// Index of the block containing word `offset`, or `None` if the offset
    /// falls in the header or padding, or past the pool.
    pub fn block_containing(&self, offset: usize) -> Option<usize> {
        let first = self.first_block_offset();
        if offset < first || offset >= POOL_WSIZE {
            return None;
        }
        Some((offset - first) / self.block_wsize)
    }

    /// Words covered by header, padding and blocks. Always `POOL_WSIZE`.
    pub const fn total_wsize(&self) -> usize {
        self.first_block_offset() + self.num_blocks * self.block_wsize
    }

    /// Iterate the word offsets of every block in the pool.
    pub fn block_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_blocks).map(move |i| self.first_block_offset() + i * self.block_wsize)
    }
}
