//! Pool geometry and generator policy, resolved by build.rs from
//! `sizeclasses.toml` (or the file named by `SIZECLASSES_CONFIG`).

use crate::generator::GeneratorParams;
use alloc::vec::Vec;

include!(concat!(env!("OUT_DIR"), "/config_gen.rs"));

/// Words per pool available to padding and blocks.
pub const POOL_AVAIL_WSIZE: usize = POOL_WSIZE - POOL_HEADER_WSIZE;

/// The generator inputs the built-in tables were produced from.
pub fn params() -> GeneratorParams {
    GeneratorParams {
        sizeclass_max: SIZECLASS_MAX,
        pool_wsize: POOL_WSIZE,
        pool_header_wsize: POOL_HEADER_WSIZE,
        max_overhead: MAX_OVERHEAD,
        required: Vec::from(REQUIRED_SIZECLASSES),
    }
}
