extern crate alloc;

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[allow(dead_code)]
#[path = "src/generator.rs"]
mod generator;

use generator::{GeneratorParams, SizeClassTable};

#[derive(Deserialize, Default)]
struct ConfigSection {
    pool_wsize: Option<usize>,
    pool_header_wsize: Option<usize>,
    sizeclass_max: Option<usize>,
    max_overhead: Option<f64>,
}

#[derive(Deserialize, Default)]
struct Config {
    #[serde(default)]
    config: ConfigSection,
    required: Option<Vec<usize>>,
}

fn resolve_config(config: Config) -> GeneratorParams {
    let defaults = GeneratorParams::default();
    let cfg = config.config;
    GeneratorParams {
        sizeclass_max: cfg.sizeclass_max.unwrap_or(defaults.sizeclass_max),
        pool_wsize: cfg.pool_wsize.unwrap_or(defaults.pool_wsize),
        pool_header_wsize: cfg.pool_header_wsize.unwrap_or(defaults.pool_header_wsize),
        max_overhead: cfg.max_overhead.unwrap_or(defaults.max_overhead),
        required: config.required.unwrap_or(defaults.required),
    }
}

fn default_config_path() -> String {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    format!("{}/sizeclasses.toml", manifest_dir)
}

fn generate_config(params: &GeneratorParams, out_path: &Path) {
    let required: Vec<String> = params.required.iter().map(|s| s.to_string()).collect();
    let code = format!(
        "// Auto-generated by build.rs. Do not edit.\n\n\
         pub const POOL_WSIZE: usize = {};\n\
         pub const POOL_HEADER_WSIZE: usize = {};\n\
         pub const SIZECLASS_MAX: usize = {};\n\
         pub const MAX_OVERHEAD: f64 = {:?};\n\
         pub const REQUIRED_SIZECLASSES: [usize; {}] = [{}];\n",
        params.pool_wsize,
        params.pool_header_wsize,
        params.sizeclass_max,
        params.max_overhead,
        required.len(),
        required.join(", "),
    );
    fs::write(out_path, code).expect("failed to write config_gen.rs");
}

fn generate_size_classes(table: &SizeClassTable, out_path: &Path) {
    fs::write(out_path, table.to_rust_source()).expect("failed to write size_class_gen.rs");
}

fn main() {
    println!("cargo:rerun-if-env-changed=SIZECLASSES_CONFIG");
    println!("cargo:rerun-if-changed=src/generator.rs");

    let out_dir = env::var("OUT_DIR").unwrap();

    let config_path = env::var("SIZECLASSES_CONFIG").unwrap_or_else(|_| default_config_path());
    println!("cargo:rerun-if-changed={}", config_path);
    let content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", config_path, e));

    let config: Config = toml::from_str(&content).expect("failed to parse TOML config");
    let params = resolve_config(config);

    let table = generator::generate(&params)
        .unwrap_or_else(|e| panic!("SIZECLASSES_CONFIG ({}): {}", config_path, e));

    generate_config(&params, &Path::new(&out_dir).join("config_gen.rs"));
    generate_size_classes(&table, &Path::new(&out_dir).join("size_class_gen.rs"));
}
