//! Device drivers subsystem
//!
//! Organized by device class:
//! - `mmio`: Register bus shared by every driver
//! - `tty`: Debug port and on-screen console
//! - `ipc`: Sync latch and FIFO between the two cores
//! - `irq`: Interrupt controller
//! - `dma`, `timer`: DMA channels and general-purpose timers
//! - `memctl`: Shared WRAM, external memory and extended configuration
//! - `video`: Display engines, VRAM banks, palette and OAM

pub mod dma;
pub mod ipc;
pub mod irq;
pub mod memctl;
pub mod mmio;
pub mod timer;
pub mod tty;
pub mod video;
