use std::borrow::Cow;
use std::ops::Index;

use tracing::debug;
use tracing::info;
use tracing::trace;
use tracing::warn;

use crate::error::InvalidRom;

pub(crate) mod vram;

use self::vram::CpuVramIndex;
use self::vram::VRam;

/// The largest ROM image the bus will map. Anything past this would need a bank controller.
pub const ROM_WINDOW: usize = 0x8000;

/// Read from the boot region while the boot overlay is active.
pub const BOOT_SENTINEL: u8 = 0xFF;

/// This trait is used to abstract over the memory map. This is used during testing.
pub trait MemoryLike {
    fn read_byte(&self, addr: u16) -> u8;

    fn write_byte(&mut self, addr: u16, val: u8);

    /// Reads a little-endian word. The high byte comes from `addr + 1`, which wraps.
    fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read_byte(addr);
        let hi = self.read_byte(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    fn write_word(&mut self, addr: u16, val: u16) {
        let [lo, hi] = val.to_le_bytes();
        self.write_byte(addr, lo);
        self.write_byte(addr.wrapping_add(1), hi);
    }

    /// Whether the boot overlay is hiding the bottom of the ROM.
    fn in_bios(&self) -> bool {
        false
    }

    /// Permanently removes the boot overlay.
    fn exit_bios(&mut self) {}
}

/// The `impl FnOnce` in `update_byte` would make `MemoryLike` non-object safe.
pub trait MemoryLikeExt: MemoryLike {
    /// Reads the byte at `addr`, passes it through `op`, and writes the result back. Returns the
    /// new value.
    fn update_byte(&mut self, addr: u16, op: impl FnOnce(u8) -> u8) -> u8 {
        let val = op(self.read_byte(addr));
        self.write_byte(addr, val);
        val
    }
}

impl<M: MemoryLike + ?Sized> MemoryLikeExt for M {}

/// Owns every addressable byte and decodes 16-bit addresses into the region that backs them.
///
/// | range         | region                                 |
/// |---------------|----------------------------------------|
/// | 0x0000-0x7FFF | ROM (bank 0 and 1, read only)          |
/// | 0x8000-0x9FFF | VRAM                                   |
/// | 0xA000-0xBFFF | external RAM                           |
/// | 0xC000-0xDFFF | work RAM                               |
/// | 0xE000-0xFDFF | mirror of work RAM                     |
/// | 0xFE00-0xFEFF | OAM (stubbed, reads 0)                 |
/// | 0xFF00-0xFF7F | I/O registers (stubbed, reads 0)       |
/// | 0xFF80-0xFFFF | high RAM                               |
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct MemoryBus {
    rom: Box<[u8]>,
    pub(crate) vram: VRam,
    eram: Box<[u8; 0x2000]>,
    wram: Box<[u8; 0x2000]>,
    hram: [u8; 0x80],
    /// While set, reads below 0x0100 return the boot sentinel rather than the ROM.
    inbios: bool,
}

impl MemoryBus {
    /// Maps the given ROM image. Images larger than the ROM window are truncated since there is no
    /// bank controller to reach the rest.
    pub fn new<'a>(rom: impl Into<Cow<'a, [u8]>>) -> Result<Self, InvalidRom> {
        let mut rom = rom.into().into_owned();
        if rom.is_empty() {
            return Err(InvalidRom::Empty);
        }
        if rom.len() > ROM_WINDOW {
            warn!(
                "ROM image is 0x{:X} bytes; only the first 0x{ROM_WINDOW:X} are mapped",
                rom.len()
            );
            rom.truncate(ROM_WINDOW);
        }
        Ok(Self {
            rom: rom.into_boxed_slice(),
            vram: VRam::new(),
            eram: Box::new([0; 0x2000]),
            wram: Box::new([0; 0x2000]),
            hram: [0; 0x80],
            inbios: false,
        })
    }

    /// Sets whether the boot overlay starts active.
    pub fn with_boot_overlay(mut self, inbios: bool) -> Self {
        self.inbios = inbios;
        self
    }

    /// The number of ROM bytes that are mapped.
    pub fn rom_len(&self) -> usize {
        self.rom.len()
    }

    #[track_caller]
    fn read_rom(&self, addr: u16) -> u8 {
        match self.rom.get(addr as usize) {
            Some(byte) => *byte,
            None => panic!(
                "read of 0x{addr:0>4X} is past the end of the 0x{:X} byte ROM image",
                self.rom.len()
            ),
        }
    }
}

impl MemoryLike for MemoryBus {
    fn read_byte(&self, addr: u16) -> u8 {
        match addr & 0xF000 {
            0x0000 if self.inbios && addr < 0x0100 => BOOT_SENTINEL,
            0x0000..=0x7000 => self.read_rom(addr),
            0x8000 | 0x9000 => self.vram[CpuVramIndex(addr & 0x1FFF)],
            0xA000 | 0xB000 => self.eram[(addr & 0x1FFF) as usize],
            0xC000 | 0xD000 | 0xE000 => self.wram[(addr & 0x1FFF) as usize],
            _ => match addr & 0x0F00 {
                // OAM and the unusable range after it
                0x0E00 => 0,
                0x0F00 if addr >= 0xFF80 => self.hram[(addr & 0x7F) as usize],
                // I/O registers
                0x0F00 => 0,
                // The tail of the work RAM mirror
                _ => self.wram[(addr & 0x1FFF) as usize],
            },
        }
    }

    fn write_byte(&mut self, addr: u16, val: u8) {
        match addr & 0xF000 {
            0x0000..=0x7000 => {
                debug!("Ignoring write of 0x{val:0>2X} to ROM at 0x{addr:0>4X}");
            }
            0x8000 | 0x9000 => self.vram[CpuVramIndex(addr & 0x1FFF)] = val,
            0xA000 | 0xB000 => self.eram[(addr & 0x1FFF) as usize] = val,
            0xC000 | 0xD000 | 0xE000 => self.wram[(addr & 0x1FFF) as usize] = val,
            _ => match addr & 0x0F00 {
                0x0E00 => trace!("Discarding write of 0x{val:0>2X} to OAM at 0x{addr:0>4X}"),
                0x0F00 if addr >= 0xFF80 => self.hram[(addr & 0x7F) as usize] = val,
                0x0F00 => trace!("Discarding write of 0x{val:0>2X} to I/O at 0x{addr:0>4X}"),
                _ => self.wram[(addr & 0x1FFF) as usize] = val,
            },
        }
    }

    fn in_bios(&self) -> bool {
        self.inbios
    }

    fn exit_bios(&mut self) {
        if self.inbios {
            info!("PC reached 0x0100, removing the boot overlay");
        }
        self.inbios = false;
    }
}

/* --------- Indexing types use by the PPU --------- */

/// A type used to index a background tile inside of the VRAM Tile Map.
///
/// This type is only used by the PPU. The coordinates are the pixel position being rendered with
/// the scroll offsets already applied; they are divided down to a map cell when indexing.
pub struct BgTileMapIndex {
    pub x: u8,
    pub y: u8,
}

impl Index<BgTileMapIndex> for MemoryBus {
    type Output = u8;

    fn index(&self, index: BgTileMapIndex) -> &Self::Output {
        &self.vram[index]
    }
}

/// A type used to index a background tile's data inside VRAM Tile Data. This index is meant to be
/// used by first indexing using the `BgTileMapIndex` and then constructing this index from the
/// value returned there. Tile numbers are unsigned, starting at 0x8000.
pub struct BgTileDataIndex {
    pub index: u8,
}

impl Index<BgTileDataIndex> for MemoryBus {
    type Output = [u8; 16];

    fn index(&self, index: BgTileDataIndex) -> &Self::Output {
        &self.vram[index]
    }
}

#[cfg(test)]
impl MemoryLike for Vec<u8> {
    fn read_byte(&self, addr: u16) -> u8 {
        self[addr as usize]
    }

    fn write_byte(&mut self, addr: u16, val: u8) {
        self[addr as usize] = val;
    }
}
