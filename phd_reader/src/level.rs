use std::{fs, io, path::Path};
use byteorder::{ReadBytesExt, LE};
use log::{debug, info};
use crate::{
	model::TextureTables, skip::{Skipper, AFTER_TEXTURES, BEFORE_TEXTURES, ROOM}, AtlasPage, BinaryCursor,
	FormatError, FormatWarning, Level, LoadError, Palette, Readable, Report, ATLAS_PIXELS,
};

pub const VERSION: u32 = 0x20;

/// Runs `read` as the named section, turning read failures into `FormatError`s.
fn section<'a, T, F>(cursor: &mut BinaryCursor<'a>, name: &'static str, read: F) -> Result<T, FormatError>
where F: FnOnce(&mut BinaryCursor<'a>) -> io::Result<T> {
	let offset = cursor.position();
	read(cursor).map_err(|e| FormatError::from_io(name, offset, e))
}

fn read_atlases(cursor: &mut BinaryCursor) -> io::Result<Box<[AtlasPage]>> {
	let num_atlases = cursor.read_u32::<LE>()? as u64;
	//check up front so a bad count fails before allocating
	let len = num_atlases * ATLAS_PIXELS as u64;
	if len > cursor.remaining() as u64 {
		return Err(io::Error::new(
			io::ErrorKind::UnexpectedEof,
			format!("{} atlases need {} bytes, {} remain", num_atlases, len, cursor.remaining()),
		));
	}
	(0..num_atlases)
		.map(|_| -> io::Result<AtlasPage> {
			let pixels = cursor.take_bytes(ATLAS_PIXELS)?;
			Ok(AtlasPage(Box::new(pixels.try_into().unwrap())))//exactly ATLAS_PIXELS
		})
		.collect()
}

/// Decodes the atlases, texture descriptors and palette of a level in one forward pass,
/// stepping over everything else.
pub fn read_level<R: Report + ?Sized>(data: &[u8], report: &mut R) -> Result<Level, FormatError> {
	let mut cursor = BinaryCursor::new(data);
	let version = section(&mut cursor, "version", |c| c.read_u32::<LE>())?;
	if version != VERSION {
		report.warning(FormatWarning::Version { found: version });
	}
	let atlases = section(&mut cursor, "atlases", read_atlases)?;
	info!("atlases: {}", atlases.len());
	let reserved = section(&mut cursor, "reserved", |c| c.read_u32::<LE>())?;
	if reserved != 0 {
		report.warning(FormatWarning::Reserved { found: reserved });
	}
	let num_rooms = section(&mut cursor, "room count", |c| c.read_u16::<LE>())?;
	let mut skipper = Skipper::new(&mut cursor);
	for _ in 0..num_rooms {
		skipper.skip_all(ROOM)?;
	}
	info!("rooms: {}", num_rooms);
	skipper.skip_all(BEFORE_TEXTURES)?;
	let TextureTables { object_textures, sprite_textures } = section(&mut cursor, "texture tables", |c| TextureTables::read(c))?;
	info!("object textures: {}, sprite textures: {}", object_textures.len(), sprite_textures.len());
	for (index, texture) in object_textures.iter().enumerate() {
		debug!("object texture {}: {:?}", index, texture);
	}
	for (index, texture) in sprite_textures.iter().enumerate() {
		debug!("sprite texture {}: {:?}, size {}x{}", index, texture, texture.rect().width, texture.rect().height);
	}
	Skipper::new(&mut cursor).skip_all(AFTER_TEXTURES)?;
	let palette = section(&mut cursor, "palette", |c| Palette::read(c))?;
	if cursor.remaining() > 0 {
		debug!("{} bytes after palette", cursor.remaining());
	}
	Ok(Level { version, atlases, object_textures, sprite_textures, palette })
}

pub fn load_level<R: Report + ?Sized>(path: &Path, report: &mut R) -> Result<Level, LoadError> {
	let data = fs::read(path).map_err(|source| match source.kind() {
		io::ErrorKind::NotFound => LoadError::NotFound(path.to_owned()),
		_ => LoadError::Io { path: path.to_owned(), source },
	})?;
	Ok(read_level(&data, report)?)
}

#[cfg(test)]
mod tests {
	use byteorder::{WriteBytesExt, LE};
	use crate::{BlendMode, Color3, FormatError, FormatWarning, TexRect, ATLAS_PIXELS, PALETTE_LEN};
	use super::*;

	/// Minimal level: given version, atlases, rooms and texture tables, every skipped count 0.
	struct LevelBuilder {
		version: u32,
		reserved: u32,
		atlases: Vec<u8>,
		rooms: Vec<Vec<u8>>,
		/// attributes, atlas, then x, y per corner
		object_textures: Vec<[u16; 10]>,
		/// atlas, x, y, width, height, left
		sprite_textures: Vec<[u16; 6]>,
		boxes: u32,
		palette: Vec<u8>,
	}

	impl LevelBuilder {
		fn new() -> Self {
			Self {
				version: VERSION,
				reserved: 0,
				atlases: vec![],
				rooms: vec![],
				object_textures: vec![],
				sprite_textures: vec![],
				boxes: 0,
				palette: vec![0; PALETTE_LEN * 3],
			}
		}

		fn atlas(mut self, fill: u8) -> Self {
			self.atlases.extend(std::iter::repeat(fill).take(ATLAS_PIXELS));
			self
		}

		fn build(&self) -> Vec<u8> {
			let mut out = vec![];
			out.write_u32::<LE>(self.version).unwrap();
			out.write_u32::<LE>((self.atlases.len() / ATLAS_PIXELS) as u32).unwrap();
			out.extend(&self.atlases);
			out.write_u32::<LE>(self.reserved).unwrap();
			out.write_u16::<LE>(self.rooms.len() as u16).unwrap();
			for room in &self.rooms {
				out.extend(room);
			}
			out.extend([0; 11 * 4]);//floor data through static meshes
			out.write_u32::<LE>(self.object_textures.len() as u32).unwrap();
			for words in self.object_textures.iter().flatten() {
				out.write_u16::<LE>(*words).unwrap();
			}
			out.write_u32::<LE>(self.sprite_textures.len() as u32).unwrap();
			for words in &self.sprite_textures {
				out.write_u16::<LE>(words[0]).unwrap();
				out.write_u8(words[1] as u8).unwrap();
				out.write_u8(words[2] as u8).unwrap();
				for &word in &words[3..] {
					out.write_u16::<LE>(word).unwrap();
				}
				out.extend([0; 6]);//top, right, bottom
			}
			out.extend([0; 3 * 4]);//sprite sequences, cameras, sound sources
			out.write_u32::<LE>(self.boxes).unwrap();
			out.extend(std::iter::repeat(0).take(self.boxes as usize * 20));
			out.write_u32::<LE>(0).unwrap();//overlaps
			out.extend(std::iter::repeat(0).take(self.boxes as usize * 12));//zones
			out.extend([0; 2 * 4]);//animated textures, entities
			out.extend([0; 8192]);
			out.extend(&self.palette);
			out
		}
	}

	fn room(portals: u16, sectors: (u16, u16), lights: u16) -> Vec<u8> {
		let mut room = vec![0; 16];
		room.write_u32::<LE>(3).unwrap();
		room.extend([0; 6]);
		room.write_u16::<LE>(portals).unwrap();
		room.extend(std::iter::repeat(0).take(portals as usize * 32));
		room.write_u16::<LE>(sectors.0).unwrap();
		room.write_u16::<LE>(sectors.1).unwrap();
		room.extend(std::iter::repeat(0).take((sectors.0 * sectors.1) as usize * 8));
		room.extend([0; 2]);
		room.write_u16::<LE>(lights).unwrap();
		room.extend(std::iter::repeat(0).take(lights as usize * 18));
		room.write_u16::<LE>(0).unwrap();
		room.extend([0; 4]);
		room
	}

	fn read(data: &[u8]) -> (Result<Level, FormatError>, Vec<FormatWarning>) {
		let mut warnings = vec![];
		(read_level(data, &mut warnings), warnings)
	}

	#[test]
	fn decodes_textures_and_palette() {
		let mut builder = LevelBuilder::new().atlas(1).atlas(2);
		builder.object_textures.push([1, 0x8001, 10 << 8, 20 << 8, 10 << 8, 30 << 8, 20 << 8, 20 << 8, 20 << 8, 30 << 8]);
		builder.sprite_textures.push([1, 4, 8, 3 * 256, 256, 0xFFFF]);
		builder.palette[3..6].copy_from_slice(&[10, 20, 30]);
		let (level, warnings) = read(&builder.build());
		let level = level.unwrap();
		assert!(warnings.is_empty());
		assert_eq!(level.version, VERSION);
		assert_eq!(level.atlases.len(), 2);
		assert!(level.atlases[1].pixels().iter().all(|&p| p == 2));
		let texture = &level.object_textures[0];
		assert_eq!(texture.blend_mode, BlendMode::Test);
		assert_eq!(texture.atlas_index(), 1);
		assert_eq!(texture.bounds, TexRect { x: 10, y: 20, width: 11, height: 11 });
		let sprite = &level.sprite_textures[0];
		assert_eq!(sprite.atlas_index, 1);
		assert_eq!(sprite.rect(), TexRect { x: 4, y: 8, width: 4, height: 2 });
		assert_eq!(sprite.left, -1);
		assert_eq!(level.palette.colors()[1], Color3 { r: 40, g: 80, b: 120 });
	}

	#[test]
	fn palette_is_always_full_and_scaled() {
		let mut builder = LevelBuilder::new();
		builder.palette = (0..PALETTE_LEN * 3).map(|i| (i % 64) as u8).collect();
		let level = read(&builder.build()).0.unwrap();
		assert_eq!(level.palette.colors().len(), PALETTE_LEN);
		for Color3 { r, g, b } in level.palette.colors() {
			assert!([r, g, b].iter().all(|&&c| c % 4 == 0 && c <= 252));
		}
	}

	#[test]
	fn rooms_and_zones_are_stepped_over() {
		let mut builder = LevelBuilder::new().atlas(0);
		builder.rooms.push(room(2, (3, 4), 1));
		builder.rooms.push(room(0, (1, 1), 0));
		builder.boxes = 5;
		builder.sprite_textures.push([0, 1, 2, 0, 0, 0]);
		builder.palette[PALETTE_LEN * 3 - 1] = 63;
		let level = read(&builder.build()).0.unwrap();
		assert_eq!(level.sprite_textures.len(), 1);
		assert_eq!(level.palette.colors()[PALETTE_LEN - 1], Color3 { r: 0, g: 0, b: 252 });
	}

	#[test]
	fn version_and_reserved_mismatch_only_warn() {
		let mut builder = LevelBuilder::new();
		builder.version = 0x2D;
		builder.reserved = 7;
		let (level, warnings) = read(&builder.build());
		assert_eq!(level.unwrap().version, 0x2D);
		assert_eq!(warnings, [FormatWarning::Version { found: 0x2D }, FormatWarning::Reserved { found: 7 }]);
	}

	#[test]
	fn zero_atlases_is_not_an_error() {
		let mut builder = LevelBuilder::new();
		builder.object_textures.push([0; 10]);
		let level = read(&builder.build()).0.unwrap();
		assert!(level.atlases.is_empty());
		assert_eq!(level.object_textures.len(), 1);
	}

	#[test]
	fn truncated_atlas() {
		let mut data = LevelBuilder::new().atlas(0).build();
		data.truncate(8 + ATLAS_PIXELS - 1);
		let err = read(&data).0.unwrap_err();
		assert!(matches!(err, FormatError::Truncated { section: "atlases", offset: 4 }));
	}

	#[test]
	fn huge_atlas_count_is_truncation() {
		let mut data = vec![];
		data.write_u32::<LE>(VERSION).unwrap();
		data.write_u32::<LE>(u32::MAX).unwrap();
		let err = read(&data).0.unwrap_err();
		assert!(matches!(err, FormatError::Truncated { section: "atlases", .. }));
	}

	#[test]
	fn truncated_room() {
		let mut builder = LevelBuilder::new();
		builder.rooms.push(room(1, (2, 2), 0));
		let mut data = builder.build();
		data.truncate(4 + 4 + 4 + 2 + 16 + 4 + 6 + 2 + 10);
		let err = read(&data).0.unwrap_err();
		assert!(matches!(err, FormatError::Truncated { section: "room portals", .. }));
	}

	#[test]
	fn truncated_palette() {
		let mut data = LevelBuilder::new().build();
		data.pop();
		let err = read(&data).0.unwrap_err();
		assert!(matches!(err, FormatError::Truncated { section: "palette", .. }));
	}

	#[test]
	fn empty_input() {
		let err = read(&[]).0.unwrap_err();
		assert!(matches!(err, FormatError::Truncated { section: "version", offset: 0 }));
	}

	#[test]
	fn missing_file() {
		let path = Path::new("definitely/not/here.phd");
		let err = load_level(path, &mut Vec::<FormatWarning>::new()).unwrap_err();
		assert!(matches!(err, LoadError::NotFound(p) if p == path));
	}
}
