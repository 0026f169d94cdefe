//! On-screen text console for boot diagnostics.
//!
//! The console draws into a 32x32 text background map on the sub engine.
//! Each map entry is a 16-bit tile reference; the font is expected to be
//! loaded with glyph `n` at tile index `n`, so a byte of text maps directly
//! to a tile number. Glyph upload belongs to whoever prepared the sub
//! screen before this stub ran.
//!
//! Font and map both live in VRAM bank H, which must stay resident through
//! the hardware reset. The reset still sweeps the sub engine registers,
//! unmaps the bank's sub-background mapping and clears the palettes, so
//! [`Console::reattach`] puts those back before anything more is drawn.

use crate::drivers::mmio::RegisterBus;
use crate::drivers::video::{self, vram, VramBank};

/// Bank holding the console's font and map.
pub const BACKING_BANK: VramBank = VramBank::H;

/// Sub-engine background VRAM, where [`BACKING_BANK`] appears when mapped
/// with [`vram::CR_SUB_BG`].
pub const SUB_BG_VRAM: usize = 0x0620_0000;

/// Map block 15 of sub-engine background VRAM, the last one inside bank H.
pub const SUB_TEXT_MAP: usize = SUB_BG_VRAM + 15 * 0x800;

/// Mode 0, BG0 only, graphics display.
const DISPCNT_TEXT: u32 = 0x0001_0100;
/// 4bpp tiles from character block 0, map from block 15, 32x32 cells.
const BG0CNT_TEXT: u16 = 0x0F00;

/// Colour index the font draws glyph pixels with.
const GLYPH_INK: usize = 1;
const WHITE: u16 = 0x7FFF;

/// Width and height of the text map, in cells.
const MAP_DIM: u8 = 32;

/// Palette bank used for console glyphs.
const GLYPH_PALETTE_BANK: usize = 15;
const GLYPH_PALETTE: u16 = (GLYPH_PALETTE_BANK as u16) << 12;

const BLANK: u8 = b' ';

/// Sink for diagnostic text.
pub trait Console {
    /// Restrict output to a `width` x `height` cell window at (`x`, `y`) and
    /// home the cursor.
    fn set_viewport(&mut self, x: u8, y: u8, width: u8, height: u8);

    /// Append `text` at the cursor.
    fn print(&mut self, text: &str);

    /// Restore whatever display state the console needs after the hardware
    /// reset swept it. Cursor and viewport are kept.
    fn reattach(&mut self) {}
}

/// Console for builds without on-screen diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullConsole;

impl Console for NullConsole {
    fn set_viewport(&mut self, _x: u8, _y: u8, _width: u8, _height: u8) {}

    fn print(&mut self, _text: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Viewport {
    x: u8,
    y: u8,
    width: u8,
    height: u8,
}

/// Console writing into a background tile map.
pub struct MapConsole<B> {
    bus: B,
    map: usize,
    viewport: Viewport,
    col: u8,
    row: u8,
}

impl<B: RegisterBus> MapConsole<B> {
    /// Console over the map at `map`, initially covering the whole map.
    pub fn new(bus: B, map: usize) -> Self {
        Self {
            bus,
            map,
            viewport: Viewport {
                x: 0,
                y: 0,
                width: MAP_DIM,
                height: MAP_DIM,
            },
            col: 0,
            row: 0,
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Cursor position relative to the viewport, as (column, row).
    pub fn cursor(&self) -> (u8, u8) {
        (self.col, self.row)
    }

    fn cell_addr(&self, col: u8, row: u8) -> usize {
        let x = (self.viewport.x + col) as usize;
        let y = (self.viewport.y + row) as usize;
        self.map + (y * MAP_DIM as usize + x) * 2
    }

    fn put(&mut self, byte: u8) {
        let addr = self.cell_addr(self.col, self.row);
        self.bus.write16(addr, GLYPH_PALETTE | byte as u16);
    }

    fn clear_row(&mut self, row: u8) {
        for col in 0..self.viewport.width {
            let addr = self.cell_addr(col, row);
            self.bus.write16(addr, GLYPH_PALETTE | BLANK as u16);
        }
    }

    fn newline(&mut self) {
        self.col = 0;
        self.row += 1;
        if self.row >= self.viewport.height {
            self.row = 0;
        }
        self.clear_row(self.row);
    }
}

impl<B: RegisterBus> Console for MapConsole<B> {
    fn set_viewport(&mut self, x: u8, y: u8, width: u8, height: u8) {
        let x = x.min(MAP_DIM - 1);
        let y = y.min(MAP_DIM - 1);
        self.viewport = Viewport {
            x,
            y,
            width: width.clamp(1, MAP_DIM - x),
            height: height.clamp(1, MAP_DIM - y),
        };
        self.col = 0;
        self.row = 0;
    }

    fn reattach(&mut self) {
        self.bus.write8(BACKING_BANK.control_reg(), vram::CR_SUB_BG);
        self.bus.write32(video::REG_DISPCNT_SUB, DISPCNT_TEXT);
        self.bus.write16(video::REG_BG0CNT_SUB, BG0CNT_TEXT);

        let palette = video::SUB_BG_PALETTE + GLYPH_PALETTE_BANK * 32;
        self.bus.write16(palette + GLYPH_INK * 2, WHITE);
    }

    fn print(&mut self, text: &str) {
        for byte in text.bytes() {
            if byte == b'\n' {
                self.newline();
                continue;
            }
            if self.col >= self.viewport.width {
                self.newline();
            }
            self.put(byte);
            self.col += 1;
        }
    }
}
