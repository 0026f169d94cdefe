use std::env;
use std::path::PathBuf;
use std::process::Command;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let target = env::var("TARGET").unwrap();

    // Only the bare-metal ARM9 target gets the entry stub and memory layout
    if target.starts_with("armv5te") && target.contains("-none-") {
        // Assemble boot.s
        let status = Command::new("clang")
            .args([
                "-target",
                "armv5te-none-eabi",
                "-mcpu=arm946e-s",
                "-c",
                "src/boot.s",
                "-o",
            ])
            .arg(out_dir.join("boot.o"))
            .status()
            .expect("Failed to assemble boot.s");

        if !status.success() {
            panic!("Assembly failed");
        }

        // Create libboot.a from boot.o
        let status = Command::new("ar")
            .args(["crs"])
            .arg(out_dir.join("libboot.a"))
            .arg(out_dir.join("boot.o"))
            .status()
            .expect("Failed to create libboot.a");

        if !status.success() {
            panic!("Failed to create archive");
        }

        // Link the boot object file
        println!("cargo:rustc-link-search=native={}", out_dir.display());
        println!("cargo:rustc-link-lib=static:+whole-archive=boot");
        println!("cargo:rustc-link-arg-bins=-Tlinker.ld");
    }

    // Re-run if the assembly or linker.ld changes
    println!("cargo:rerun-if-changed=src/boot.s");
    println!("cargo:rerun-if-changed=src/arch/arm/trampoline.s");
    println!("cargo:rerun-if-changed=linker.ld");
}
