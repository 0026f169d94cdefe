//! Architecture-specific code
//!
//! The ARM9 (ARMv5TE, ARM946E-S) pieces live in `arm`. Everything that needs
//! real instructions is gated on `target_arch = "arm"`; host builds get
//! inert stand-ins so the boot logic can be tested off target.

pub mod arm;
