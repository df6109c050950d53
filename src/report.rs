//! Human-readable size class report.
//!
//! Use [`print_report`] to dump the built-in table, or [`render`] to format
//! any generated [`SizeClassTable`] (e.g. when tuning `sizeclasses.toml`).

use crate::generator::SizeClassTable;
use crate::size_class::{self, WORD_SIZE};
use std::fmt::Write;
use std::println;
use std::string::String;

/// Format `table` as a per-class listing followed by summary lines.
pub fn render(table: &SizeClassTable) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Size classes: {} (pool {} words, header {} words, max object {} words)\n",
        table.num_sizeclasses(),
        table.pool_wsize,
        table.pool_header_wsize,
        table.sizeclass_max,
    );
    let _ = writeln!(
        out,
        "  {:>5}   {:>6}   {:>6}   {:>7}   {:>6}   {:>8}",
        "Class", "Words", "Bytes", "Wastage", "Blocks", "Overhead"
    );
    let _ = writeln!(
        out,
        "  {:->5}   {:->6}   {:->6}   {:->7}   {:->6}   {:->8}",
        "", "", "", "", "", ""
    );

    for (cls, (&wsize, &wastage)) in table
        .wsize_sizeclass
        .iter()
        .zip(&table.wastage_sizeclass)
        .enumerate()
    {
        let _ = writeln!(
            out,
            "  {:>5}   {:>6}   {:>6}   {:>7}   {:>6}   {:>7.2}%",
            cls,
            wsize,
            wsize * WORD_SIZE,
            wastage,
            table.blocks_per_pool(cls),
            table.overhead(cls) * 100.0,
        );
    }

    let _ = writeln!(
        out,
        "\nWorst-case pool overhead over all object sizes: {:.2}%",
        table.max_overhead() * 100.0
    );
    out
}

/// Print the built-in size class table to stdout.
pub fn print_report() {
    println!("{}", render(&size_class::table()));
}
