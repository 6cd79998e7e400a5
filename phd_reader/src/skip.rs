//! Sections that are stepped over without being decoded, described by their record widths.

use byteorder::{ReadBytesExt, LE};
use log::trace;
use crate::{BinaryCursor, FormatError};

#[derive(Clone, Copy, Debug)]
pub(crate) enum CountWidth {
	U16,
	U32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum Layout {
	/// Fixed number of bytes.
	Fixed(u64),
	/// Count, then that many records of the given byte width.
	List(CountWidth, u64),
	/// Like `List`, and the count is kept for following `PerKept` sections.
	KeptList(CountWidth, u64),
	/// One record of the given byte width per item of the last `KeptList`.
	PerKept(u64),
	/// u16 x and z dimensions, then `x * z` records of the given byte width.
	Grid(u64),
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Section {
	pub name: &'static str,
	pub layout: Layout,
}

const fn section(name: &'static str, layout: Layout) -> Section {
	Section { name, layout }
}

use CountWidth::{U16, U32};
use Layout::{Fixed, Grid, KeptList, List, PerKept};

/// One room. Repeated for each room in the u16 room count.
pub(crate) const ROOM: &[Section] = &[
	section("room info", Fixed(16)),
	section("room geometry", List(U32, 2)),
	section("room portals", List(U16, 32)),
	section("room sectors", Grid(8)),
	section("room ambient light", Fixed(2)),
	section("room lights", List(U16, 18)),
	section("room static meshes", List(U16, 18)),
	section("alternate room", Fixed(2)),
	section("room flags", Fixed(2)),
];

/// From after the rooms up to the object textures.
pub(crate) const BEFORE_TEXTURES: &[Section] = &[
	section("floor data", List(U32, 2)),
	section("mesh data", List(U32, 2)),
	section("mesh pointers", List(U32, 4)),
	section("animations", List(U32, 32)),
	section("state changes", List(U32, 6)),
	section("anim dispatches", List(U32, 8)),
	section("anim commands", List(U32, 2)),
	section("mesh trees", List(U32, 4)),
	section("frames", List(U32, 2)),
	section("models", List(U32, 18)),
	section("static meshes", List(U32, 32)),
];

/// From after the sprite textures up to the palette.
pub(crate) const AFTER_TEXTURES: &[Section] = &[
	section("sprite sequences", List(U32, 8)),
	section("cameras", List(U32, 16)),
	section("sound sources", List(U32, 16)),
	section("boxes", KeptList(U32, 20)),
	section("overlaps", List(U32, 2)),
	section("ground zones 1", PerKept(2)),
	section("ground zones 2", PerKept(2)),
	section("fly zones", PerKept(2)),
	section("ground zones 1 alt", PerKept(2)),
	section("ground zones 2 alt", PerKept(2)),
	section("fly zones alt", PerKept(2)),
	section("animated textures", List(U32, 2)),
	section("entities", List(U32, 22)),
	section("light map", Fixed(8192)),
];

/// Walks a table of sections, keeping the count of the latest `KeptList`.
pub(crate) struct Skipper<'c, 'a> {
	cursor: &'c mut BinaryCursor<'a>,
	kept: u64,
}

impl<'c, 'a> Skipper<'c, 'a> {
	pub fn new(cursor: &'c mut BinaryCursor<'a>) -> Self {
		Self { cursor, kept: 0 }
	}

	fn read_count(&mut self, width: CountWidth) -> std::io::Result<u64> {
		Ok(match width {
			U16 => self.cursor.read_u16::<LE>()? as u64,
			U32 => self.cursor.read_u32::<LE>()? as u64,
		})
	}

	/// Bytes the section occupies after its count fields.
	fn body_len(&mut self, layout: Layout) -> std::io::Result<(u64, u64)> {
		Ok(match layout {
			Fixed(len) => (1, len),
			List(width, stride) => {
				let count = self.read_count(width)?;
				(count, stride)
			},
			KeptList(width, stride) => {
				self.kept = self.read_count(width)?;
				(self.kept, stride)
			},
			PerKept(stride) => (self.kept, stride),
			Grid(stride) => {
				let x = self.cursor.read_u16::<LE>()? as u64;
				let z = self.cursor.read_u16::<LE>()? as u64;
				(x * z, stride)
			},
		})
	}

	pub fn skip(&mut self, section: &Section) -> Result<(), FormatError> {
		let offset = self.cursor.position();
		let to_err = |e| FormatError::from_io(section.name, offset, e);
		let (count, stride) = self.body_len(section.layout).map_err(to_err)?;
		let len = count.checked_mul(stride).ok_or(FormatError::Truncated { section: section.name, offset })?;
		self.cursor.skip(len).map_err(to_err)?;
		trace!("skipped {}: {} x {} bytes at {:#x}", section.name, count, stride, offset);
		Ok(())
	}

	pub fn skip_all(&mut self, sections: &[Section]) -> Result<(), FormatError> {
		for section in sections {
			self.skip(section)?;
		}
		Ok(())
	}
}
