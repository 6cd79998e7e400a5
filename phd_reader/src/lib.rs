extern crate self as phd_reader;

pub mod cursor;
pub mod model;
mod error;
mod impls;
mod level;
mod skip;

use std::io::{Read, Result};
use num_traits::AsPrimitive;
pub use phd_derive::Readable;
pub use cursor::BinaryCursor;
pub use error::{FormatError, FormatWarning, LoadError, LogReport, Report};
pub use level::{load_level, read_level, VERSION};
pub use model::{
	AtlasAndFlag, AtlasPage, BlendMode, Color3, Level, ObjectTexture, Palette, SpriteTexture, TexCoord,
	TexRect, ATLAS_PIXELS, ATLAS_SIDE_LEN, PALETTE_LEN,
};

/// Most items reserved up front for a count read from the file.
/// Larger lists grow as they are read, so a corrupt count fails on truncation instead of allocation.
const PREALLOC_LIMIT: usize = 4096;

pub trait Readable: Sized {
	fn read<R: Read>(reader: &mut R) -> Result<Self>;
}

pub fn read_boxed_slice<R: Read, T: Readable>(reader: &mut R, len: usize) -> Result<Box<[T]>> {
	let mut vec = Vec::with_capacity(len.min(PREALLOC_LIMIT));
	for _ in 0..len {
		vec.push(T::read(reader)?);
	}
	Ok(vec.into_boxed_slice())
}

pub fn read_list<R: Read, T: Readable, L: Readable + AsPrimitive<usize>>(reader: &mut R) -> Result<Box<[T]>> {
	let len = L::read(reader)?.as_();
	read_boxed_slice(reader, len)
}
