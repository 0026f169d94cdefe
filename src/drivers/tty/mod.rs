//! Text output devices
//!
//! - `debug_port`: emulator debug log, backs `print!`/`println!`
//! - `console`: on-screen tile-map console used by boot diagnostics

pub mod console;
pub mod debug_port;

pub use console::{Console, MapConsole, NullConsole};
pub use debug_port::WRITER;
