use std::ops::Index;

use heapless::Vec as InlineVec;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::trace;

use crate::cpu::check_bit;
use crate::mem::BgTileDataIndex;
use crate::mem::BgTileMapIndex;

// Notes:
// A tile is 16 bytes, which means that each line is 2 bytes.
// Every pixel has a color-depth of 2. The nth bit of the first byte holds the nth pixel's least
// significant bit of the color depth. The most significant bit is in the corresponding bit of
// second byte. Bit 7 is the leftmost pixel.

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

/// The last line of the vertical blank. After it, the PPU starts over at line 0.
const LAST_LINE: u8 = 153;

/// The number of clock cycles in one full frame, VBlank included.
const FRAME_DOTS: u64 = (LAST_LINE as u64 + 1) * PpuMode::VBlank.threshold() as u64;

/// One finished screen of 2-bit color indices, row-major.
pub type Frame = [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT];

/// What the PPU needs from memory in order to render the background.
pub trait BackgroundMemory:
    Index<BgTileMapIndex, Output = u8> + Index<BgTileDataIndex, Output = [u8; 16]>
{
}

impl<M> BackgroundMemory for M where
    M: Index<BgTileMapIndex, Output = u8> + Index<BgTileDataIndex, Output = [u8; 16]>
{
}

#[repr(u8)]
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    derive_more::IsVariant,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
pub enum PpuMode {
    /// Also refered to as "Mode 2" in the pandocs.
    #[default]
    OamRead = 2,
    /// Also refered to as "Mode 3" in the pandocs.
    VramRead = 3,
    /// Also refered to as "Mode 0" in the pandocs.
    HBlank = 0,
    /// Also refered to as "Mode 1" in the pandocs.
    VBlank = 1,
}

impl PpuMode {
    /// The number of clock cycles spent in this mode before moving to the next. VBlank is spent
    /// one line at a time.
    pub const fn threshold(self) -> u32 {
        match self {
            PpuMode::OamRead => 80,
            PpuMode::VramRead => 172,
            PpuMode::HBlank => 204,
            PpuMode::VBlank => 456,
        }
    }
}

/// The Pixel Processing Unit. Only the background is drawn.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Ppu {
    mode: PpuMode,
    /// The clock cycles spent in the current mode. Always less than the mode's threshold between
    /// steps.
    dots: u32,
    /// The current scanline, 0 through 153.
    line: u8,
    scroll_x: u8,
    scroll_y: u8,
    /// Represents the LCD screen.
    frame: Box<Frame>,
    frames: u64,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            mode: PpuMode::default(),
            dots: 0,
            line: 0,
            scroll_x: 0,
            scroll_y: 0,
            frame: Box::new([[0; SCREEN_WIDTH]; SCREEN_HEIGHT]),
            frames: 0,
        }
    }

    pub fn mode(&self) -> PpuMode {
        self.mode
    }

    pub fn line(&self) -> u8 {
        self.line
    }

    /// The cycles spent so far in the current mode.
    pub fn mode_clock(&self) -> u32 {
        self.dots
    }

    /// The most recently rendered screen. Complete once `step` has signaled the end of a frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frames_completed(&self) -> u64 {
        self.frames
    }

    pub fn scroll(&self) -> (u8, u8) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn set_scroll(&mut self, x: u8, y: u8) {
        self.scroll_x = x;
        self.scroll_y = y;
    }

    /// Advances the PPU by the given number of clock cycles. Cycles beyond a mode's threshold
    /// count towards the next mode, so a single large step can pass through several modes.
    ///
    /// Returns `true` if a frame was completed (i.e. the PPU entered VBlank).
    pub fn step<M: BackgroundMemory>(&mut self, cycles: u32, mem: &M) -> bool {
        let mut finished = false;
        let mut dots = self.dots as u64 + cycles as u64;
        // Memory can not change during a step, so every whole frame draws the same picture. Only
        // the last one needs to be walked through.
        if dots >= 2 * FRAME_DOTS {
            let skipped = dots / FRAME_DOTS - 1;
            dots -= skipped * FRAME_DOTS;
            self.frames += skipped;
            finished = true;
        }
        while dots >= self.mode.threshold() as u64 {
            dots -= self.mode.threshold() as u64;
            finished |= self.next_mode(mem);
        }
        // Always below the current mode's threshold
        self.dots = dots as u32;
        finished
    }

    fn next_mode<M: BackgroundMemory>(&mut self, mem: &M) -> bool {
        match self.mode {
            PpuMode::OamRead => self.mode = PpuMode::VramRead,
            PpuMode::VramRead => {
                self.mode = PpuMode::HBlank;
                self.render_scanline(mem);
            }
            PpuMode::HBlank => {
                self.line += 1;
                if self.line as usize == SCREEN_HEIGHT {
                    self.mode = PpuMode::VBlank;
                    self.frames += 1;
                    debug!("Finished frame {}", self.frames);
                    return true;
                }
                self.mode = PpuMode::OamRead;
            }
            PpuMode::VBlank => {
                self.line += 1;
                if self.line > LAST_LINE {
                    self.line = 0;
                    self.mode = PpuMode::OamRead;
                }
            }
        }
        false
    }

    /// Draws the background for the current line, starting from the scroll offsets. The tile
    /// changes every 8 pixels.
    fn render_scanline<M: BackgroundMemory>(&mut self, mem: &M) {
        trace!("Rendering scanline {}", self.line);
        let y = self.line.wrapping_add(self.scroll_y);
        let offset = (y & 0x7) as usize * 2;
        let mut row: InlineVec<u8, 8> = InlineVec::new();
        for (x, pixel) in self.frame[self.line as usize].iter_mut().enumerate() {
            let x = (x as u8).wrapping_add(self.scroll_x);
            if row.is_empty() || x & 0x7 == 0 {
                let index = mem[BgTileMapIndex { x, y }];
                let tile = &mem[BgTileDataIndex { index }];
                row = zip_bits(tile[offset + 1], tile[offset]).collect();
            }
            *pixel = row[(x & 0x7) as usize];
        }
    }
}

/// Combines the two bit-planes of one tile row into eight color indices, leftmost pixel first.
pub fn zip_bits(hi: u8, lo: u8) -> impl Iterator<Item = u8> {
    (0..8)
        .rev()
        .map(move |i| (check_bit(i, hi), check_bit(i, lo)))
        .map(|(hi, lo)| (hi as u8) << 1 | lo as u8)
}

/// One of the four greys of the screen.
#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Shade {
    #[default]
    White,
    LightGrey,
    DarkGrey,
    Black,
}

impl Shade {
    /// The 8-bit luminance of the shade.
    pub const fn luma(self) -> u8 {
        match self {
            Shade::White => 0xFF,
            Shade::LightGrey => 0xAA,
            Shade::DarkGrey => 0x55,
            Shade::Black => 0x00,
        }
    }
}

/// Maps color indices onto shades. This is a presentation concern; the PPU only ever produces
/// indices.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(pub [Shade; 4]);

impl Default for Palette {
    fn default() -> Self {
        Self([Shade::White, Shade::LightGrey, Shade::DarkGrey, Shade::Black])
    }
}

impl Palette {
    /// Only the bottom two bits of the index are used.
    pub fn shade(&self, index: u8) -> Shade {
        self.0[(index & 0x3) as usize]
    }
}
