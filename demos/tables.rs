use sizeclasses::report;
use sizeclasses::{PoolLayout, SIZECLASS_MAX, try_class_of};

fn main() {
    println!("sizeclasses demo");
    println!("================\n");

    report::print_report();

    for wsize in [1, 11, 33, 100, SIZECLASS_MAX, SIZECLASS_MAX + 1] {
        match try_class_of(wsize) {
            Some(cls) => {
                let layout = PoolLayout::for_class(cls);
                println!(
                    "{:>4} words -> class {:>2} ({} words, {} blocks from offset {})",
                    wsize,
                    cls,
                    layout.block_wsize,
                    layout.num_blocks,
                    layout.first_block_offset()
                );
            }
            None => println!("{:>4} words -> large object path", wsize),
        }
    }
}
