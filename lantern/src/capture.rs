use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use wisp::ppu::Frame;
use wisp::ppu::Palette;
use wisp::ppu::SCREEN_HEIGHT;
use wisp::ppu::SCREEN_WIDTH;

use crate::error::LanternError;

/// Turns a frame of color indices into one greyscale byte per pixel.
pub fn greyscale(frame: &Frame, palette: &Palette) -> Vec<u8> {
    frame
        .iter()
        .flatten()
        .map(|index| palette.shade(*index).luma())
        .collect()
}

/// Writes the frame out as an 8-bit greyscale PNG.
pub fn save_frame(frame: &Frame, palette: &Palette, path: &Path) -> Result<(), LanternError> {
    let file = File::create(path).map_err(|e| LanternError::io(path, e))?;
    let w = BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&greyscale(frame, palette))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use wisp::ppu::Shade;

    use super::*;

    #[test]
    fn greyscale_uses_the_palette() {
        let mut frame = [[0; SCREEN_WIDTH]; SCREEN_HEIGHT];
        frame[0][1] = 3;
        frame[1][0] = 1;
        let data = greyscale(&frame, &Palette::default());
        assert_eq!(data.len(), SCREEN_WIDTH * SCREEN_HEIGHT);
        assert_eq!(data[0], 0xFF);
        assert_eq!(data[1], 0x00);
        assert_eq!(data[SCREEN_WIDTH], 0xAA);

        let inverted = Palette([Shade::Black, Shade::DarkGrey, Shade::LightGrey, Shade::White]);
        assert_eq!(greyscale(&frame, &inverted)[1], 0xFF);
    }

    #[test]
    fn frame_is_written_as_png() {
        let frame = [[2; SCREEN_WIDTH]; SCREEN_HEIGHT];
        let path = std::env::temp_dir().join(format!("lantern-frame-{}.png", std::process::id()));
        save_frame(&frame, &Palette::default(), &path).unwrap();
        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (160, 144));
        assert_eq!(info.color_type, png::ColorType::Grayscale);
        std::fs::remove_file(path).unwrap();
    }
}
