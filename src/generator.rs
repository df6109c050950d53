//! Size class table generator.
//!
//! Computes, from the pool geometry and the largest object size served by
//! size classes, the three tables the pool allocator indexes at runtime:
//!
//! - the ascending block size (in words) of each size class,
//! - the padding words placed after the pool header so that blocks of the
//!   class tile the rest of the pool exactly,
//! - a dense map from object word size to the first class that fits it.
//!
//! Class sizes are picked by walking object sizes downward from
//! `sizeclass_max`. An object of `obj` words stored in blocks of `slot` words
//! leaves `1 - (avail / slot) * obj / avail` of the pool unused. Whenever that
//! exceeds `max_overhead` the object size opens a new class. Small sizes end
//! up with a class each; larger ones are spaced roughly geometrically.
//!
//! This file is also compiled into `build.rs` (via `#[path]`), so it must not
//! refer to anything else in the crate.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Write;
#[cfg(feature = "debug")]
use std::println;

/// Index type of a size class.
pub type SizeClassIdx = u8;

/// Reverse lookup entry for word size 0, which is never requested.
pub const INVALID_SIZECLASS: SizeClassIdx = SizeClassIdx::MAX;

/// Largest number of classes an index can address without colliding with
/// [`INVALID_SIZECLASS`].
pub const MAX_NUM_SIZECLASSES: usize = INVALID_SIZECLASS as usize;

/// Errors that abort table generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenError {
    #[error("sizeclass_max must be > 0")]
    ZeroSizeclassMax,
    #[error("pool_wsize must be > 0")]
    ZeroPoolWsize,
    #[error("pool_header_wsize ({header}) must be < pool_wsize ({pool})")]
    HeaderExceedsPool { header: usize, pool: usize },
    #[error("{wsize}-word class does not fit in the {avail} usable words of a pool")]
    ClassExceedsPool { wsize: usize, avail: usize },
    #[error("max_overhead ({0}) must be in (0, 1)")]
    InvalidOverhead(f64),
    #[error("required size {wsize} is outside 1..={max}")]
    RequiredOutOfRange { wsize: usize, max: usize },
    #[error("{wsize}-word objects cannot fit in a {avail}-word pool below {max_overhead} overhead ({overhead})")]
    OverheadUnreachable {
        wsize: usize,
        avail: usize,
        overhead: f64,
        max_overhead: f64,
    },
    #[error("too many size classes ({count}, max {max})")]
    TooManyClasses { count: usize, max: usize },
    #[error("inconsistent table at {at}: {what}")]
    Inconsistent { what: &'static str, at: usize },
}

/// Inputs to [`generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    /// Largest object size (words) served from a size class.
    pub sizeclass_max: usize,
    /// Total words per pool, header included.
    pub pool_wsize: usize,
    /// Words of per-pool metadata in front of the first block.
    pub pool_header_wsize: usize,
    /// Upper bound on the unused fraction of a pool for any object size.
    pub max_overhead: f64,
    /// Sizes that always get a class of their own.
    pub required: Vec<usize>,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            sizeclass_max: 128,
            pool_wsize: 4096,
            pool_header_wsize: 7,
            max_overhead: 0.101,
            required: vec![16, 32],
        }
    }
}

impl GeneratorParams {
    /// Words left for blocks and padding once the header is placed.
    pub const fn avail_wsize(&self) -> usize {
        self.pool_wsize - self.pool_header_wsize
    }

    fn check(&self) -> Result<(), GenError> {
        if self.sizeclass_max == 0 {
            return Err(GenError::ZeroSizeclassMax);
        }
        if self.pool_wsize == 0 {
            return Err(GenError::ZeroPoolWsize);
        }
        if self.pool_header_wsize >= self.pool_wsize {
            return Err(GenError::HeaderExceedsPool {
                header: self.pool_header_wsize,
                pool: self.pool_wsize,
            });
        }
        if self.sizeclass_max > self.avail_wsize() {
            return Err(GenError::ClassExceedsPool {
                wsize: self.sizeclass_max,
                avail: self.avail_wsize(),
            });
        }
        // Also rejects NaN.
        if !(self.max_overhead > 0.0 && self.max_overhead < 1.0) {
            return Err(GenError::InvalidOverhead(self.max_overhead));
        }
        if let Some(&wsize) = self
            .required
            .iter()
            .find(|&&w| w == 0 || w > self.sizeclass_max)
        {
            return Err(GenError::RequiredOutOfRange {
                wsize,
                max: self.sizeclass_max,
            });
        }
        Ok(())
    }
}

/// Fraction of `avail` words left unused when a pool of `slot`-word blocks
/// holds objects of `obj` words.
#[inline]
pub fn overhead(avail: usize, slot: usize, obj: usize) -> f64 {
    1.0 - ((avail / slot) * obj) as f64 / avail as f64
}

/// A generated size class table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeClassTable {
    pub pool_wsize: usize,
    pub pool_header_wsize: usize,
    pub sizeclass_max: usize,
    /// Block size of each class, strictly ascending.
    pub wsize_sizeclass: Vec<usize>,
    /// Padding words after the pool header, per class.
    pub wastage_sizeclass: Vec<usize>,
    /// `sizeclass_wsize[w]` is the first class whose block holds `w` words.
    /// Entry 0 is [`INVALID_SIZECLASS`].
    pub sizeclass_wsize: Vec<SizeClassIdx>,
}

/// Generate the size class table for `params`.
pub fn generate(params: &GeneratorParams) -> Result<SizeClassTable, GenError> {
    params.check()?;

    let sizes = select_sizes(params)?;
    if sizes.len() > MAX_NUM_SIZECLASSES {
        return Err(GenError::TooManyClasses {
            count: sizes.len(),
            max: MAX_NUM_SIZECLASSES,
        });
    }

    let avail = params.avail_wsize();
    let wastage = sizes.iter().map(|&s| avail % s).collect();
    let lookup = build_lookup(&sizes, params.sizeclass_max);

    let table = SizeClassTable {
        pool_wsize: params.pool_wsize,
        pool_header_wsize: params.pool_header_wsize,
        sizeclass_max: params.sizeclass_max,
        wsize_sizeclass: sizes,
        wastage_sizeclass: wastage,
        sizeclass_wsize: lookup,
    };
    table.validate()?;
    Ok(table)
}

fn select_sizes(params: &GeneratorParams) -> Result<Vec<usize>, GenError> {
    let avail = params.avail_wsize();
    let mut sizes = Vec::new();
    let mut slot: Option<usize> = None;

    for obj in (1..=params.sizeclass_max).rev() {
        let new_class = match slot {
            None => true,
            Some(slot) => {
                overhead(avail, slot, obj) > params.max_overhead || params.required.contains(&obj)
            }
        };
        if !new_class {
            continue;
        }

        let own = overhead(avail, obj, obj);
        if own >= params.max_overhead {
            return Err(GenError::OverheadUnreachable {
                wsize: obj,
                avail,
                overhead: own,
                max_overhead: params.max_overhead,
            });
        }

        #[cfg(feature = "debug")]
        println!("[sizeclass] new class: {} words (overhead {:.4})", obj, own);

        sizes.push(obj);
        slot = Some(obj);
    }

    sizes.reverse();
    Ok(sizes)
}

/// Single forward sweep: `sizes` is ascending and ends at `max`, so the
/// cursor never runs past the last class.
fn build_lookup(sizes: &[usize], max: usize) -> Vec<SizeClassIdx> {
    let mut lookup = vec![INVALID_SIZECLASS; max + 1];
    let mut cls = 0;
    for (wsize, entry) in lookup.iter_mut().enumerate().skip(1) {
        while sizes[cls] < wsize {
            cls += 1;
        }
        *entry = cls as SizeClassIdx;
    }
    lookup
}

impl SizeClassTable {
    pub fn num_sizeclasses(&self) -> usize {
        self.wsize_sizeclass.len()
    }

    pub fn avail_wsize(&self) -> usize {
        self.pool_wsize - self.pool_header_wsize
    }

    /// First class able to hold `wsize` words, or `None` outside
    /// `1..=sizeclass_max`.
    pub fn class_of(&self, wsize: usize) -> Option<usize> {
        if wsize == 0 || wsize > self.sizeclass_max {
            return None;
        }
        Some(self.sizeclass_wsize[wsize] as usize)
    }

    /// Number of blocks a pool of class `cls` is carved into.
    pub fn blocks_per_pool(&self, cls: usize) -> usize {
        self.avail_wsize() / self.wsize_sizeclass[cls]
    }

    /// Fraction of usable pool words lost to padding in class `cls`.
    pub fn overhead(&self, cls: usize) -> f64 {
        self.wastage_sizeclass[cls] as f64 / self.avail_wsize() as f64
    }

    /// Worst fraction of a pool left unused over every object size, counting
    /// both padding and the rounding of objects up to their class size.
    pub fn max_overhead(&self) -> f64 {
        let avail = self.avail_wsize();
        (1..=self.sizeclass_max)
            .map(|w| overhead(avail, self.wsize_sizeclass[self.sizeclass_wsize[w] as usize], w))
            .fold(0.0, f64::max)
    }

    /// Re-check every invariant the pool allocator relies on.
    pub fn validate(&self) -> Result<(), GenError> {
        let n = self.num_sizeclasses();
        let fail = |what, at| Err(GenError::Inconsistent { what, at });

        if self.pool_header_wsize >= self.pool_wsize {
            return fail("pool header fills the whole pool", 0);
        }
        if n == 0 {
            return fail("no size classes", 0);
        }
        if n > MAX_NUM_SIZECLASSES {
            return fail("class count does not fit the index type", n);
        }
        if self.wastage_sizeclass.len() != n {
            return fail("wastage table length differs from class count", n);
        }
        if self.sizeclass_wsize.len() != self.sizeclass_max + 1 {
            return fail("lookup table length is not sizeclass_max + 1", self.sizeclass_wsize.len());
        }
        if self.sizeclass_wsize[0] != INVALID_SIZECLASS {
            return fail("lookup entry 0 is not the sentinel", 0);
        }
        if self.wsize_sizeclass[n - 1] != self.sizeclass_max {
            return fail("last class is not sizeclass_max", n - 1);
        }

        let avail = self.avail_wsize();
        for (i, (&wsize, &wastage)) in self
            .wsize_sizeclass
            .iter()
            .zip(&self.wastage_sizeclass)
            .enumerate()
        {
            if wsize == 0 {
                return fail("zero class size", i);
            }
            if i > 0 && wsize <= self.wsize_sizeclass[i - 1] {
                return fail("class sizes not strictly increasing", i);
            }
            if wsize > avail {
                return fail("class size exceeds usable pool words", i);
            }
            if wastage >= wsize {
                return fail("wastage not smaller than class size", i);
            }
            if (avail - wastage) % wsize != 0 {
                return fail("blocks do not tile the pool", i);
            }
        }

        for wsize in 1..=self.sizeclass_max {
            let cls = self.sizeclass_wsize[wsize] as usize;
            if cls >= n {
                return fail("lookup entry out of range", wsize);
            }
            if self.wsize_sizeclass[cls] < wsize {
                return fail("lookup class too small", wsize);
            }
            if cls > 0 && self.wsize_sizeclass[cls - 1] >= wsize {
                return fail("lookup class is not the first fit", wsize);
            }
        }
        Ok(())
    }

    /// Render the tables as Rust items for `include!`.
    ///
    /// The including module must have `SIZECLASS_MAX` and `SizeClassIdx` in
    /// scope.
    pub fn to_rust_source(&self) -> String {
        let mut code = String::from("// Auto-generated by build.rs. Do not edit.\n\n");
        let _ = writeln!(
            code,
            "pub const NUM_SIZECLASSES: usize = {};\n",
            self.num_sizeclasses()
        );

        code.push_str(
            "/// The largest size for this size class.\n\
             /// (A gap is left after smaller objects.)\n",
        );
        push_array(&mut code, "WSIZE_SIZECLASS", "u32", "NUM_SIZECLASSES", &self.wsize_sizeclass);

        code.push_str(
            "\n/// The number of padding words to use, at the beginning of a pool\n\
             /// of this size class, to reach exactly POOL_WSIZE words.\n",
        );
        push_array(&mut code, "WASTAGE_SIZECLASS", "u32", "NUM_SIZECLASSES", &self.wastage_sizeclass);

        code.push_str("\n/// Map from (positive) object sizes to size classes.\n");
        push_array(
            &mut code,
            "SIZECLASS_WSIZE",
            "SizeClassIdx",
            "SIZECLASS_MAX + 1",
            &self.sizeclass_wsize,
        );
        code
    }
}

fn push_array<T: core::fmt::Display>(code: &mut String, name: &str, ty: &str, len: &str, values: &[T]) {
    let _ = writeln!(code, "pub static {name}: [{ty}; {len}] = [");
    for chunk in values.chunks(16) {
        code.push_str("   ");
        for v in chunk {
            let _ = write!(code, " {v},");
        }
        code.push('\n');
    }
    code.push_str("];\n");
}
