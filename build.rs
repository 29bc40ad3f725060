// build.rs

use chrono::Utc;
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("build_info.rs");

    // stamped into --version and the start-up banner
    let build_date = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    fs::write(
        &dest_path,
        format!("pub const BUILD_DATE: &str = \"{}\";", build_date),
    )
    .expect("build_info.rs is writable");

    // also as an env var so clap's version string can concat! it
    println!("cargo:rustc-env=MCLOCK_BUILD_DATE={}", build_date);
    println!("cargo:rerun-if-changed=build.rs");
}
