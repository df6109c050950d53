//! Generator properties across pool geometries other than the built-in one.

use sizeclasses::generator::{GenError, GeneratorParams, INVALID_SIZECLASS, SizeClassTable, generate};

fn params(pool: usize, header: usize, max: usize, max_overhead: f64, required: &[usize]) -> GeneratorParams {
    GeneratorParams {
        sizeclass_max: max,
        pool_wsize: pool,
        pool_header_wsize: header,
        max_overhead,
        required: required.to_vec(),
    }
}

fn configs() -> Vec<GeneratorParams> {
    vec![
        GeneratorParams::default(),
        params(4096, 4, 128, 0.101, &[]),
        params(8192, 7, 256, 0.101, &[]),
        params(2048, 2, 64, 0.125, &[8]),
        params(1024, 0, 16, 0.2, &[]),
        params(4096, 7, 128, 0.05, &[]),
    ]
}

fn check_invariants(p: &GeneratorParams, t: &SizeClassTable) {
    let n = t.num_sizeclasses();
    assert!(n >= 1 && n < 256);
    assert_eq!(t.wsize_sizeclass[n - 1], p.sizeclass_max);
    assert_eq!(t.sizeclass_wsize.len(), p.sizeclass_max + 1);
    assert_eq!(t.sizeclass_wsize[0], INVALID_SIZECLASS);

    for i in 1..n {
        assert!(t.wsize_sizeclass[i - 1] < t.wsize_sizeclass[i]);
    }

    for cls in 0..n {
        let wsize = t.wsize_sizeclass[cls];
        let wastage = t.wastage_sizeclass[cls];
        assert!(wastage < wsize);
        let k = t.blocks_per_pool(cls);
        assert!(k >= 1);
        assert_eq!(p.pool_header_wsize + wastage + k * wsize, p.pool_wsize);
    }

    for wsize in 1..=p.sizeclass_max {
        let cls = t.class_of(wsize).unwrap();
        assert!(t.wsize_sizeclass[cls] >= wsize);
        assert!((0..cls).all(|i| t.wsize_sizeclass[i] < wsize));
    }
    assert_eq!(t.class_of(0), None);
    assert_eq!(t.class_of(p.sizeclass_max + 1), None);
}

#[test]
fn test_invariants_hold_for_all_configs() {
    for p in configs() {
        let t = generate(&p).unwrap_or_else(|e| panic!("{:?}: {}", p, e));
        check_invariants(&p, &t);
        assert!(t.validate().is_ok());
    }
}

#[test]
fn test_overhead_never_exceeds_bound() {
    for p in configs() {
        let t = generate(&p).unwrap();
        assert!(
            t.max_overhead() <= p.max_overhead,
            "{:?}: worst overhead {}",
            p,
            t.max_overhead()
        );
    }
}

#[test]
fn test_required_sizes_are_classes() {
    for p in configs() {
        let t = generate(&p).unwrap();
        for w in &p.required {
            assert!(t.wsize_sizeclass.contains(w), "{:?}: {} missing", p, w);
        }
    }
}

#[test]
fn test_deterministic() {
    for p in configs() {
        assert_eq!(generate(&p).unwrap(), generate(&p).unwrap());
        assert_eq!(
            generate(&p).unwrap().to_rust_source(),
            generate(&p).unwrap().to_rust_source()
        );
    }
}

#[test]
fn test_tighter_overhead_means_more_classes() {
    let loose = generate(&params(4096, 7, 128, 0.101, &[])).unwrap();
    let tight = generate(&params(4096, 7, 128, 0.05, &[])).unwrap();
    assert!(tight.num_sizeclasses() > loose.num_sizeclasses());
}

#[test]
fn test_small_sizes_are_exact() {
    let t = generate(&GeneratorParams::default()).unwrap();
    assert_eq!(&t.wsize_sizeclass[..10], &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
}

#[test]
fn test_class_too_large_for_pool() {
    // 1024-word objects: three per pool, 1017 words unused.
    let err = generate(&params(4096, 7, 1024, 0.101, &[])).unwrap_err();
    assert!(matches!(
        err,
        GenError::OverheadUnreachable { wsize: 1024, avail: 4089, .. }
    ));
    let msg = err.to_string();
    assert!(msg.starts_with("1024-word objects cannot fit in a 4089-word pool"), "{}", msg);
}

#[test]
fn test_header_exceeding_pool_is_rejected() {
    let err = generate(&params(64, 64, 8, 0.101, &[])).unwrap_err();
    assert_eq!(err, GenError::HeaderExceedsPool { header: 64, pool: 64 });
    assert_eq!(err.to_string(), "pool_header_wsize (64) must be < pool_wsize (64)");
}

#[test]
fn test_single_class() {
    let t = generate(&params(100, 0, 1, 0.5, &[])).unwrap();
    assert_eq!(t.wsize_sizeclass, [1]);
    assert_eq!(t.wastage_sizeclass, [0]);
    assert_eq!(t.sizeclass_wsize, [INVALID_SIZECLASS, 0]);
}
