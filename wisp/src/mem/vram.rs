use std::ops::Index;
use std::ops::IndexMut;

use super::BgTileDataIndex;
use super::BgTileMapIndex;

/// The first 0x1800 bytes of VRAM hold tile data, the rest holds the two background tile maps.
const TILE_DATA_LEN: usize = 0x1800;
const TILE_MAP_LEN: usize = 0x2000 - TILE_DATA_LEN;

/// This wrapper type is used to communicate that the VRAM is being indexed by the CPU. The value is
/// the offset into VRAM (the address with the top three bits masked off).
pub(super) struct CpuVramIndex(pub u16);

/// Video RAM, accessible through the address range 0x8000 through 0x9FFF.
///
/// The storage is split so that the PPU can borrow a whole tile (16 bytes, two per row) without any
/// slicing.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct VRam {
    tiles: Box<[[u8; 16]; 384]>,
    maps: Box<[u8; TILE_MAP_LEN]>,
}

impl VRam {
    pub(super) fn new() -> Self {
        Self {
            tiles: Box::new([[0; 16]; 384]),
            maps: Box::new([0; TILE_MAP_LEN]),
        }
    }
}

impl Index<CpuVramIndex> for VRam {
    type Output = u8;

    fn index(&self, CpuVramIndex(index): CpuVramIndex) -> &Self::Output {
        let index = index as usize;
        if index < TILE_DATA_LEN {
            &self.tiles[index / 16][index % 16]
        } else {
            &self.maps[index - TILE_DATA_LEN]
        }
    }
}

impl IndexMut<CpuVramIndex> for VRam {
    fn index_mut(&mut self, CpuVramIndex(index): CpuVramIndex) -> &mut Self::Output {
        let index = index as usize;
        if index < TILE_DATA_LEN {
            &mut self.tiles[index / 16][index % 16]
        } else {
            &mut self.maps[index - TILE_DATA_LEN]
        }
    }
}

/* --------- Indexing types use by the PPU --------- */

impl Index<BgTileMapIndex> for VRam {
    type Output = u8;

    fn index(&self, BgTileMapIndex { x, y }: BgTileMapIndex) -> &Self::Output {
        let x = x as usize / 8;
        let y = y as usize / 8;
        &self.maps[(y * 32) + x]
    }
}

impl Index<BgTileDataIndex> for VRam {
    type Output = [u8; 16];

    fn index(&self, BgTileDataIndex { index }: BgTileDataIndex) -> &Self::Output {
        &self.tiles[index as usize]
    }
}
