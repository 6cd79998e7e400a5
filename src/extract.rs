use phd_reader::{AtlasPage, TexRect};

/// Palette indices, row-major, no padding between rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
	pub width: u32,
	pub height: u32,
	pub pixels: Box<[u8]>,
}

/// Copies `rect` out of `atlas` row by row.
///
/// Panics if `rect` is empty or does not lie entirely within the atlas.
pub fn extract(atlas: &AtlasPage, rect: TexRect) -> IndexedImage {
	assert!(rect.fits_atlas(), "{} does not fit in an atlas page", rect);
	let x = rect.x as usize;
	let width = rect.width as usize;
	let mut pixels = Vec::with_capacity(width * rect.height as usize);
	for row in atlas.rows().skip(rect.y as usize).take(rect.height as usize) {
		pixels.extend_from_slice(&row[x..][..width]);
	}
	IndexedImage { width: rect.width as u32, height: rect.height as u32, pixels: pixels.into_boxed_slice() }
}
