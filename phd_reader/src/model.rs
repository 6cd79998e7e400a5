use std::{fmt, io::{Read, Result}};
use bitfield::bitfield;
use byteorder::{ReadBytesExt, LE};
use shared::MinMax;
use crate::Readable;

pub const ATLAS_SIDE_LEN: usize = 256;
pub const ATLAS_PIXELS: usize = ATLAS_SIDE_LEN * ATLAS_SIDE_LEN;
pub const PALETTE_LEN: usize = 256;

/// 256x256 palette indices, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct AtlasPage(pub Box<[u8; ATLAS_PIXELS]>);

impl AtlasPage {
	pub fn pixels(&self) -> &[u8; ATLAS_PIXELS] {
		&self.0
	}

	pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
		self.0.chunks_exact(ATLAS_SIDE_LEN)
	}
}

impl fmt::Debug for AtlasPage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AtlasPage").finish_non_exhaustive()
	}
}

#[derive(Readable, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color3 {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Color3 {
	/// 6-bit channels to 8-bit. Channels above 63 wrap, as an 8-bit multiply would.
	pub fn scaled(self) -> Self {
		let Color3 { r, g, b } = self;
		Color3 { r: r.wrapping_mul(4), g: g.wrapping_mul(4), b: b.wrapping_mul(4) }
	}
}

/// Colors already scaled to 8 bits per channel, so the brightest channel is 252.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette(pub Box<[Color3; PALETTE_LEN]>);

impl Readable for Palette {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		let mut colors = Box::<[Color3; PALETTE_LEN]>::read(reader)?;
		for color in colors.iter_mut() {
			*color = color.scaled();
		}
		Ok(Palette(colors))
	}
}

impl Palette {
	pub fn colors(&self) -> &[Color3; PALETTE_LEN] {
		&self.0
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
	Opaque,
	/// Index 0 is see-through.
	Test,
	Unknown(u16),
}

impl Readable for BlendMode {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(match reader.read_u16::<LE>()? {
			0 => BlendMode::Opaque,
			1 => BlendMode::Test,
			m => BlendMode::Unknown(m),
		})
	}
}

bitfield! {
	#[derive(Readable, Clone, Copy, PartialEq, Eq)]
	pub struct AtlasAndFlag(u16);
	impl Debug;
	/// Index into `Level.atlases`
	pub atlas_index, _: 14, 0;
	pub flag, _: 15;
}

/// One quad corner, quantized to whole pixels by keeping the high byte of each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TexCoord {
	pub x: u8,
	pub y: u8,
}

impl Readable for TexCoord {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		let x = (reader.read_u16::<LE>()? >> 8) as u8;
		let y = (reader.read_u16::<LE>()? >> 8) as u8;
		Ok(TexCoord { x, y })
	}
}

/// Pixel rectangle on one atlas page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TexRect {
	pub x: u8,
	pub y: u8,
	pub width: u16,
	pub height: u16,
}

impl TexRect {
	/// Exclusive.
	pub fn x_end(&self) -> u32 {
		self.x as u32 + self.width as u32
	}

	/// Exclusive.
	pub fn y_end(&self) -> u32 {
		self.y as u32 + self.height as u32
	}

	pub fn fits_atlas(&self) -> bool {
		self.width > 0 &&
		self.height > 0 &&
		self.x_end() <= ATLAS_SIDE_LEN as u32 &&
		self.y_end() <= ATLAS_SIDE_LEN as u32
	}
}

/// `(x--x_end)(y--y_end)`, the Glidos texture file stem.
impl fmt::Display for TexRect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}--{})({}--{})", self.x, self.x_end(), self.y, self.y_end())
	}
}

/// Inclusive span to a start and length.
fn span_len(MinMax { min, max }: MinMax<u8>) -> (u8, u16) {
	(min, max as u16 - min as u16 + 1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectTexture {
	pub blend_mode: BlendMode,
	pub atlas: AtlasAndFlag,
	/// Not in any particular winding.
	pub corners: [TexCoord; 4],
	/// Bounding box of `corners`.
	pub bounds: TexRect,
}

impl ObjectTexture {
	pub fn new(blend_mode: BlendMode, atlas: AtlasAndFlag, corners: [TexCoord; 4]) -> Self {
		let (x, width) = span_len(MinMax::of(corners.map(|c| c.x)));
		let (y, height) = span_len(MinMax::of(corners.map(|c| c.y)));
		let bounds = TexRect { x, y, width, height };
		Self { blend_mode, atlas, corners, bounds }
	}

	pub fn atlas_index(&self) -> usize {
		self.atlas.atlas_index() as usize
	}
}

impl Readable for ObjectTexture {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		let blend_mode = BlendMode::read(reader)?;
		let atlas = AtlasAndFlag::read(reader)?;
		let corners = <[TexCoord; 4]>::read(reader)?;
		Ok(ObjectTexture::new(blend_mode, atlas, corners))
	}
}

#[derive(Readable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteTexture {
	/// Index into `Level.atlases`, unmasked.
	pub atlas_index: u16,
	pub x: u8,
	pub y: u8,
	/// `(pixels - 1) * 256`
	pub width: u16,
	/// `(pixels - 1) * 256`
	pub height: u16,
	pub left: i16,
	pub top: i16,
	pub right: i16,
	pub bottom: i16,
}

impl SpriteTexture {
	pub fn rect(&self) -> TexRect {
		TexRect {
			x: self.x,
			y: self.y,
			width: self.width / 256 + 1,
			height: self.height / 256 + 1,
		}
	}
}

#[derive(Readable)]
pub(crate) struct TextureTables {
	#[list(u32)]
	pub object_textures: Box<[ObjectTexture]>,
	#[list(u32)]
	pub sprite_textures: Box<[SpriteTexture]>,
}

#[derive(Debug)]
pub struct Level {
	pub version: u32,
	pub atlases: Box<[AtlasPage]>,
	pub object_textures: Box<[ObjectTexture]>,
	pub sprite_textures: Box<[SpriteTexture]>,
	pub palette: Palette,
}
