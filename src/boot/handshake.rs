//! Boot handshake with the companion core.
//!
//! ```text
//!   Start ──companion ≥ START──▶ MemoryClear ──reset done──▶ Ready
//!     │                                                        │
//!     └──────────── companion ERROR ───────────▶ Halt ◀────────┤
//!                                                              │
//!                                   Run ◀── companion BOOT_BINARY
//! ```
//!
//! The mailbox holds only the latest token from each side, so every
//! transition out of a waiting state is decided by a single poll. The
//! companion may race ahead between polls; the rendezvous therefore accepts
//! any state ranked at or after `START`. A rendezvous that waits for
//! `START` exactly would spin forever on a companion that latched a later
//! state before the first poll.
//!
//! Progress codes are drawn and cleared while waiting for the guest.
//! Failure codes are left pending so the halt path draws them last.
//!
//! `Run` and `Halt` are terminal. Stepping a terminal machine does nothing:
//! no mailbox traffic, no bus access, no drawing.

use super::{BootSession, ErrorCode, ResetSequencer};
use crate::arch::arm::cache;
use crate::config::BootConfig;
use crate::drivers::ipc::{MailboxLink, ProcessorState};
use crate::drivers::mmio::RegisterBus;
use crate::drivers::tty::Console;
use crate::drivers::{irq, video};
use crate::profile::ResetProfile;

/// Where this core is in the boot protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalState {
    /// Waiting for the companion to announce itself.
    Start,
    /// Rendezvous done, hardware reset pending.
    MemoryClear,
    /// Reset done, waiting for the companion to load the guest.
    Ready,
    /// Guest loaded; control goes to the trampoline.
    Run,
    /// Companion failed; wait for power-off.
    Halt,
}

impl LocalState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LocalState::Run | LocalState::Halt)
    }
}

pub struct Handshake<B, L, C> {
    bus: B,
    link: L,
    console: C,
    session: BootSession,
    sequencer: ResetSequencer,
    state: LocalState,
    announced: bool,
}

impl<B, L, C> Handshake<B, L, C>
where
    B: RegisterBus,
    L: MailboxLink,
    C: Console,
{
    /// Detects the reset profile; nothing is written until the first step.
    pub fn new(bus: B, link: L, console: C, config: &BootConfig) -> Self {
        let sequencer = ResetSequencer::detect(&bus, config);
        log::info!("handshake: {} hardware", sequencer.profile());
        Self {
            bus,
            link,
            console,
            session: BootSession::new(config),
            sequencer,
            state: LocalState::Start,
            announced: false,
        }
    }

    pub fn state(&self) -> LocalState {
        self.state
    }

    pub fn session(&self) -> &BootSession {
        &self.session
    }

    pub fn profile(&self) -> ResetProfile {
        self.sequencer.profile()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Advance by at most one mailbox poll.
    pub fn step(&mut self) -> LocalState {
        let next = match self.state {
            LocalState::Start => self.rendezvous(),
            LocalState::MemoryClear => self.clear_memory(),
            LocalState::Ready => self.wait_for_binary(),
            terminal => return terminal,
        };

        if next != self.state {
            log::debug!("handshake: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
        next
    }

    /// Step until `Run` or `Halt`.
    pub fn run(&mut self) -> LocalState {
        loop {
            let state = self.step();
            if state.is_terminal() {
                return state;
            }
        }
    }

    /// Poll the companion once, adopting any status word it posted.
    fn observe(&mut self) -> ProcessorState {
        let companion = self.link.recv();
        if let Some(raw) = self.link.poll_status() {
            self.session.mirror(raw);
        }
        companion
    }

    fn fail(&mut self) -> LocalState {
        log::error!(
            "companion reported an error (code {:#x})",
            self.session.raw_error_code()
        );
        self.session.report(&mut self.console);
        LocalState::Halt
    }

    fn rendezvous(&mut self) -> LocalState {
        if !self.announced {
            irq::disable_all(&mut self.bus);
            if self.session.debug() {
                self.session.set_error_code(ErrorCode::StatusBootloaderStartup);
            }
            self.link.send(ProcessorState::Start);
            self.announced = true;
        }

        match self.observe() {
            ProcessorState::Error => self.fail(),
            companion if companion.has_reached(ProcessorState::Start) => LocalState::MemoryClear,
            _ => LocalState::Start,
        }
    }

    fn clear_memory(&mut self) -> LocalState {
        self.link.send(ProcessorState::MemoryCleared);
        cache::clean_and_invalidate();
        self.sequencer.run(&mut self.bus);
        if self.profile().is_extended() {
            self.console.reattach();
        }
        // The FIFO reset above leaves the sync latch alone, but READY is
        // sent only now so the companion never sees it before the reset.
        self.link.send(ProcessorState::Ready);
        LocalState::Ready
    }

    fn wait_for_binary(&mut self) -> LocalState {
        match self.observe() {
            ProcessorState::BootBinary => LocalState::Run,
            ProcessorState::Error => self.fail(),
            _ => {
                if self.session.debug() && self.session.has_pending_progress() {
                    video::wait_for_refresh_edge(&self.bus);
                    self.session.note_refresh();
                    self.session.report(&mut self.console);
                    self.session.clear_error_code();
                }
                LocalState::Ready
            }
        }
    }
}
