#![no_std]

//! sizeclasses: the size class table of a segregated-fit pool allocator.
//!
//! Objects up to [`SIZECLASS_MAX`] words are served from pools of
//! [`POOL_WSIZE`] words, each pool dedicated to one size class. This crate
//! provides:
//! - the generator that picks class sizes and per-pool padding (run by
//!   build.rs from `sizeclasses.toml`, also callable at runtime)
//! - the generated static tables with O(1) lookups
//! - the pool layout derived from a class (header, padding, blocks)
//!
//! # Usage
//!
//! ```ignore
//! let cls = sizeclasses::class_of(11);
//! let layout = sizeclasses::PoolLayout::for_class(cls);
//! assert_eq!(layout.block_wsize, 12);
//! ```

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        pub mod report;
    }
}

pub mod config;
pub mod generator;
pub mod pool;
pub mod size_class;

pub use config::{POOL_HEADER_WSIZE, POOL_WSIZE, SIZECLASS_MAX};
pub use generator::{GenError, GeneratorParams, SizeClassTable, generate};
pub use pool::PoolLayout;
pub use size_class::{NUM_SIZECLASSES, class_of, max_size_of, try_class_of, wastage_of};
