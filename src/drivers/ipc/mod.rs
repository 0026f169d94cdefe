//! Inter-processor communication with the companion (ARM7) core
//!
//! The two cores share a 4-bit sync latch in each direction. Whatever one
//! core writes stays latched until it writes again; the other core sees only
//! the most recent value. There is no queue and no acknowledgement, so the
//! boot protocol built on top must tolerate missed intermediate states.
//!
//! - `sync`: the latch itself, exposed as a [`MailboxLink`]
//! - `fifo`: the separate word FIFO, which the boot stub only ever resets

pub mod fifo;
pub mod sync;

pub use sync::IpcSync;

/// Boot progress token exchanged over the sync latch.
///
/// Both cores use the same numbering. A core only ever moves forward
/// through the ranked states, so observing a later state implies every
/// earlier one has already been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// Latch reset value; the core has not announced itself yet.
    Boot,
    Start,
    MemoryCleared,
    Ready,
    /// Companion is reading the guest binary from storage.
    LoadBinary,
    BootBinary,
    Error,
    /// Token outside the protocol.
    Unknown(u8),
}

impl ProcessorState {
    /// Decode a latch nibble.
    pub const fn from_token(token: u8) -> Self {
        match token & 0x0F {
            0 => ProcessorState::Boot,
            1 => ProcessorState::Start,
            3 => ProcessorState::Ready,
            4 => ProcessorState::MemoryCleared,
            5 => ProcessorState::LoadBinary,
            7 => ProcessorState::BootBinary,
            8 => ProcessorState::Error,
            other => ProcessorState::Unknown(other),
        }
    }

    /// Encode as a latch nibble.
    pub const fn token(self) -> u8 {
        match self {
            ProcessorState::Boot => 0,
            ProcessorState::Start => 1,
            ProcessorState::Ready => 3,
            ProcessorState::MemoryCleared => 4,
            ProcessorState::LoadBinary => 5,
            ProcessorState::BootBinary => 7,
            ProcessorState::Error => 8,
            ProcessorState::Unknown(token) => token & 0x0F,
        }
    }

    /// Position in the forward-only boot sequence. `Error` and unknown
    /// tokens are not part of it.
    pub const fn rank(self) -> Option<u8> {
        match self {
            ProcessorState::Boot => Some(0),
            ProcessorState::Start => Some(1),
            ProcessorState::MemoryCleared => Some(2),
            ProcessorState::Ready => Some(3),
            ProcessorState::LoadBinary => Some(4),
            ProcessorState::BootBinary => Some(5),
            ProcessorState::Error | ProcessorState::Unknown(_) => None,
        }
    }

    /// Whether a core latching `self` must already have sent `milestone`.
    pub fn has_reached(self, milestone: ProcessorState) -> bool {
        match (self.rank(), milestone.rank()) {
            (Some(current), Some(target)) => current >= target,
            _ => false,
        }
    }
}

/// Single-slot, last-write-wins channel to the companion core.
pub trait MailboxLink {
    /// Latch `state` for the companion. Overwrites the previous value.
    fn send(&mut self, state: ProcessorState);

    /// The companion's most recently latched state. May be stale.
    fn recv(&self) -> ProcessorState;

    /// Raw status word the companion posted, if it changed since the last
    /// call.
    ///
    /// The companion mirrors its progress and failure codes here so this
    /// core can display them. The word is read-only from this side.
    fn poll_status(&mut self) -> Option<u32> {
        None
    }
}
