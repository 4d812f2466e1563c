//! Generates `haras_ffi.h` from the `extern "C"` surface.
//!
//! The header is written to `OUT_DIR`. Set `HARAS_FFI_HEADER` to a path to
//! also get a copy there, e.g. for a host project's include directory.

use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=HARAS_FFI_HEADER");

    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let out_dir = match std::env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR is not set: {e}");
            return;
        }
    };

    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("HARAS_FFI_H")
        .generate()
    {
        Ok(bindings) => bindings,
        Err(e) => {
            println!("cargo:warning=cbindgen could not generate haras_ffi.h: {e}");
            return;
        }
    };

    bindings.write_to_file(out_dir.join("haras_ffi.h"));
    if let Ok(path) = std::env::var("HARAS_FFI_HEADER") {
        bindings.write_to_file(path);
    }
}
