//! Linker setup for the STM32H743 binary.
//!
//! Host builds (tests, `std`) skip everything except the rerun trigger.

// Build script: a missing OUT_DIR is a cargo bug, not a runtime error.
#![allow(clippy::expect_used)]

fn main() {
    #[cfg(feature = "hardware")]
    {
        use std::env;
        use std::fs;
        use std::path::PathBuf;

        let out = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
        fs::write(out.join("memory.x"), include_bytes!("../../memory.x"))
            .expect("memory.x written to OUT_DIR");
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=../../memory.x");

        // cortex-m-rt and defmt linker scripts, binary only.
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
