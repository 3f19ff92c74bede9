use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=GEOS_LIB_DIR");

    // libgeos_c must be installed on the build and target system.
    // GEOS_LIB_DIR points at a non-standard install prefix's lib directory.
    if let Ok(dir) = env::var("GEOS_LIB_DIR") {
        if !dir.is_empty() {
            println!("cargo:rustc-link-search=native={}", dir);
        }
    }

    println!("cargo:rustc-link-lib=dylib=geos_c");
}
