//! Host-side fakes for the hardware collaborators.
//!
//! [`FakeBus`] models just enough of the ARM9 address space for the drivers
//! and the boot state machine to run: byte-addressed memories that read as
//! a poison pattern until written, a write log, the IPC sync latch, a free
//! running VCOUNT and DMA fills that complete instantly.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use crate::drivers::dma;
use crate::drivers::ipc::{MailboxLink, ProcessorState};
use crate::drivers::memctl::{self, ExecMode};
use crate::drivers::mmio::RegisterBus;
use crate::drivers::tty::Console;

const REG_VCOUNT: usize = 0x0400_0006;
const REG_IPC_SYNC: usize = 0x0400_0180;

/// Scanlines per frame, including vertical blank.
const LINES_PER_FRAME: u16 = 263;

/// IPCSYNC bits that latch on write: output nibble and the two IRQ bits.
const SYNC_WRITABLE: u16 = 0x6F00;

const DMA_ENABLE: u32 = 1 << 31;
const DMA_SRC_MODE_SHIFT: u32 = 23;
const DMA_SRC_FIXED: u32 = 2;
const DMA_COUNT_MASK: u32 = 0x001F_FFFF;

/// Memories backed by flat buffers. Anything else lands in a sparse map.
const REGIONS: [(usize, usize); 6] = [
    (0x0080_0000, 0x4000),   // DTCM
    (0x01FF_8000, 0x8000),   // ITCM mirror
    (0x027F_8000, 0x8000),   // main RAM, top 32 KiB
    (0x0500_0000, 0x800),    // palette
    (0x0680_0000, 0xA_4000), // VRAM LCDC, banks A..I
    (0x0700_0000, 0x800),    // OAM
];

/// One CPU store, as seen on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusWrite {
    pub addr: usize,
    pub width: u8,
    pub value: u32,
}

struct Region {
    base: usize,
    data: Vec<u8>,
}

pub struct FakeBus {
    regions: Vec<Region>,
    sparse: BTreeMap<usize, u8>,
    writes: Vec<BusWrite>,
    reads: RefCell<BTreeMap<usize, usize>>,
    next_scanline: Cell<u16>,
    scanline: Cell<u16>,
    sync_out: u16,
    sync_in: u8,
}

impl FakeBus {
    pub const POISON8: u8 = 0xA5;
    pub const POISON16: u16 = 0xA5A5;
    pub const POISON32: u32 = 0xA5A5_A5A5;

    /// Basic hardware: the extended configuration block reads as locked.
    pub fn new() -> Self {
        let mut bus = Self {
            regions: REGIONS
                .iter()
                .map(|&(base, len)| Region {
                    base,
                    data: vec![Self::POISON8; len],
                })
                .collect(),
            sparse: BTreeMap::new(),
            writes: Vec::new(),
            reads: RefCell::new(BTreeMap::new()),
            next_scanline: Cell::new(0),
            scanline: Cell::new(0),
            sync_out: 0,
            sync_in: 0,
        };
        bus.store(memctl::REG_SCFG_EXT, 4, 0);
        bus
    }

    /// Extended hardware with the configuration block open, running in
    /// `mode`. The seeding stores are not logged.
    pub fn extended(mode: ExecMode) -> Self {
        let mut bus = Self::new();
        bus.store(memctl::REG_SCFG_EXT, 4, 0x8307_F100);
        let rom = match mode {
            ExecMode::Ntr => memctl::SCFG_ROM_NTR as u32,
            ExecMode::Twl => 0,
        };
        bus.store(memctl::REG_SCFG_ROM, 2, rom);
        bus
    }

    /// Every CPU store so far, oldest first. DMA transfers are not logged.
    pub fn writes(&self) -> &[BusWrite] {
        &self.writes
    }

    /// Values stored to exactly `addr`, oldest first.
    pub fn writes_to(&self, addr: usize) -> Vec<u32> {
        self.writes
            .iter()
            .filter(|w| w.addr == addr)
            .map(|w| w.value)
            .collect()
    }

    /// Number of reads of any width starting at register `addr`.
    pub fn reads_of(&self, addr: usize) -> usize {
        self.reads.borrow().get(&addr).copied().unwrap_or(0)
    }

    /// VCOUNT value returned by the most recent read.
    pub fn current_scanline(&self) -> u16 {
        self.scanline.get()
    }

    /// Latch `state` as if the companion core had sent it.
    pub fn set_companion_sync(&mut self, state: ProcessorState) {
        self.sync_in = state.token();
    }

    /// Latch `state` in this core's output nibble without logging a write.
    pub fn set_local_sync(&mut self, state: ProcessorState) {
        self.sync_out = (state.token() as u16) << 8;
    }

    /// State this core currently has latched for the companion.
    pub fn local_sync(&self) -> ProcessorState {
        ProcessorState::from_token(((self.sync_out >> 8) & 0x0F) as u8)
    }

    fn region(&self, addr: usize) -> Option<usize> {
        self.regions
            .iter()
            .position(|r| addr >= r.base && addr < r.base + r.data.len())
    }

    fn byte(&self, addr: usize) -> u8 {
        match self.region(addr) {
            Some(i) => {
                let region = &self.regions[i];
                region.data[addr - region.base]
            }
            None => self.sparse.get(&addr).copied().unwrap_or(Self::POISON8),
        }
    }

    fn set_byte(&mut self, addr: usize, value: u8) {
        match self.region(addr) {
            Some(i) => {
                let region = &mut self.regions[i];
                region.data[addr - region.base] = value;
            }
            None => {
                self.sparse.insert(addr, value);
            }
        }
    }

    fn load(&self, addr: usize, width: usize) -> u32 {
        (0..width).fold(0, |acc, i| acc | (self.byte(addr + i) as u32) << (8 * i))
    }

    fn store(&mut self, addr: usize, width: usize, value: u32) {
        for i in 0..width {
            self.set_byte(addr + i, (value >> (8 * i)) as u8);
        }
    }

    /// Only register reads are counted; memories are too large to track.
    fn count_read(&self, addr: usize) {
        if self.region(addr).is_some() {
            return;
        }
        *self.reads.borrow_mut().entry(addr).or_insert(0) += 1;
    }

    fn log(&mut self, addr: usize, width: u8, value: u32) {
        self.writes.push(BusWrite { addr, width, value });
    }

    fn dma_channel(addr: usize) -> Option<usize> {
        (0..dma::CHANNEL_COUNT).find(|&ch| dma::control_reg(ch) == addr)
    }

    fn run_dma(&mut self, channel: usize, control: u32) {
        let src = self.load(dma::src_reg(channel), 4) as usize;
        let dest = self.load(dma::dest_reg(channel), 4) as usize;
        let fixed = (control >> DMA_SRC_MODE_SHIFT) & 3 == DMA_SRC_FIXED;

        for i in 0..(control & DMA_COUNT_MASK) as usize {
            let from = if fixed { src } else { src + i * 4 };
            let value = self.load(from, 4);
            self.store(dest + i * 4, 4, value);
        }
        self.store(dma::control_reg(channel), 4, control & !DMA_ENABLE);
    }
}

impl Default for FakeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for FakeBus {
    fn read8(&self, addr: usize) -> u8 {
        self.count_read(addr);
        self.byte(addr)
    }

    fn read16(&self, addr: usize) -> u16 {
        self.count_read(addr);
        match addr {
            REG_VCOUNT => {
                let line = self.next_scanline.get();
                self.scanline.set(line);
                self.next_scanline.set((line + 1) % LINES_PER_FRAME);
                line
            }
            REG_IPC_SYNC => self.sync_out | self.sync_in as u16,
            _ => self.load(addr, 2) as u16,
        }
    }

    fn read32(&self, addr: usize) -> u32 {
        self.count_read(addr);
        self.load(addr, 4)
    }

    fn write8(&mut self, addr: usize, value: u8) {
        self.log(addr, 8, value as u32);
        self.store(addr, 1, value as u32);
    }

    fn write16(&mut self, addr: usize, value: u16) {
        self.log(addr, 16, value as u32);
        if addr == REG_IPC_SYNC {
            self.sync_out = value & SYNC_WRITABLE;
            return;
        }
        self.store(addr, 2, value as u32);
    }

    fn write32(&mut self, addr: usize, value: u32) {
        self.log(addr, 32, value);
        self.store(addr, 4, value);
        if value & DMA_ENABLE != 0 {
            if let Some(channel) = Self::dma_channel(addr) {
                self.run_dma(channel, value);
            }
        }
    }
}

/// Mailbox fake replaying a fixed sequence of companion states.
///
/// Each `recv` consumes one scripted state; the last one stays latched,
/// like the real register. Status words are handed out one per
/// `poll_status` call.
pub struct ScriptedLink {
    script: RefCell<VecDeque<ProcessorState>>,
    statuses: VecDeque<Option<u32>>,
    recvs: Cell<usize>,
    pub sent: Vec<ProcessorState>,
}

impl ScriptedLink {
    pub fn new(script: &[ProcessorState]) -> Self {
        Self {
            script: RefCell::new(script.iter().copied().collect()),
            statuses: VecDeque::new(),
            recvs: Cell::new(0),
            sent: Vec::new(),
        }
    }

    /// Status words returned by successive `poll_status` calls.
    pub fn with_statuses(mut self, statuses: &[Option<u32>]) -> Self {
        self.statuses = statuses.iter().copied().collect();
        self
    }

    pub fn recv_count(&self) -> usize {
        self.recvs.get()
    }
}

impl MailboxLink for ScriptedLink {
    fn send(&mut self, state: ProcessorState) {
        self.sent.push(state);
    }

    fn recv(&self) -> ProcessorState {
        self.recvs.set(self.recvs.get() + 1);
        let mut script = self.script.borrow_mut();
        if script.len() > 1 {
            script.pop_front().unwrap_or(ProcessorState::Boot)
        } else {
            script.front().copied().unwrap_or(ProcessorState::Boot)
        }
    }

    fn poll_status(&mut self) -> Option<u32> {
        self.statuses.pop_front().flatten()
    }
}

/// Console fake keeping everything it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub viewports: Vec<(u8, u8, u8, u8)>,
    pub text: String,
    pub reattached: usize,
}

impl Console for RecordingConsole {
    fn set_viewport(&mut self, x: u8, y: u8, width: u8, height: u8) {
        self.viewports.push((x, y, width, height));
    }

    fn print(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn reattach(&mut self) {
        self.reattached += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_memory_reads_poison() {
        let bus = FakeBus::new();
        assert_eq!(bus.read32(0x0080_0000), FakeBus::POISON32);
        assert_eq!(bus.read16(0x0620_F800), FakeBus::POISON16);
        assert_eq!(bus.read8(0x0400_0247), FakeBus::POISON8);
    }

    #[test]
    fn extended_bus_is_seeded_without_logging() {
        let bus = FakeBus::extended(ExecMode::Ntr);
        assert!(memctl::extended_access(&bus));
        assert_eq!(memctl::exec_mode(&bus), ExecMode::Ntr);
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn write_log_keeps_access_width() {
        let mut bus = FakeBus::new();
        bus.write8(0x0400_0247, 3);
        bus.write16(0x0400_0304, 0x820F);
        let widths: Vec<u8> = bus.writes().iter().map(|w| w.width).collect();
        assert_eq!(widths, vec![8, 16]);
    }

    #[test]
    fn scripted_link_latches_last_state() {
        let link = ScriptedLink::new(&[ProcessorState::Start, ProcessorState::Ready]);
        assert_eq!(link.recv(), ProcessorState::Start);
        assert_eq!(link.recv(), ProcessorState::Ready);
        assert_eq!(link.recv(), ProcessorState::Ready);
        assert_eq!(link.recv_count(), 3);
    }
}
