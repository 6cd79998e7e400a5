use image::{codecs::png::PngEncoder, ColorType, ImageEncoder, ImageResult};
use phd_reader::{Color3, Palette, PALETTE_LEN};
use crate::extract::IndexedImage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaPalette(pub [[u8; 4]; PALETTE_LEN]);

impl RgbaPalette {
	/// Index 0 fully transparent, every other index opaque.
	pub fn with_transparent_zero(palette: &Palette) -> Self {
		let mut colors = palette.colors().map(|Color3 { r, g, b }| [r, g, b, 255]);
		colors[0][3] = 0;
		RgbaPalette(colors)
	}

	pub fn expand(&self, image: &IndexedImage) -> Vec<u8> {
		image.pixels.iter().flat_map(|&index| self.0[index as usize]).collect()
	}
}

/// Turns an indexed image into the bytes of a lossless image file.
pub trait Encoder {
	/// File extension, without the dot.
	fn extension(&self) -> &'static str;
	fn encode(&self, image: &IndexedImage, palette: &RgbaPalette) -> ImageResult<Vec<u8>>;
}

pub struct Png;

impl Encoder for Png {
	fn extension(&self) -> &'static str {
		"png"
	}

	fn encode(&self, image: &IndexedImage, palette: &RgbaPalette) -> ImageResult<Vec<u8>> {
		let rgba = palette.expand(image);
		let mut bytes = vec![];
		PngEncoder::new(&mut bytes).write_image(&rgba, image.width, image.height, ColorType::Rgba8)?;
		Ok(bytes)
	}
}
