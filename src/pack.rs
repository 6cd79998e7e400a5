use std::{fmt, fs, io, path::{Path, PathBuf}};
use itertools::Itertools;
use log::{debug, info, warn};
use md5::{Digest, Md5};
use phd_reader::{AtlasPage, Level, TexRect};
use thiserror::Error;
use crate::{encode::{Encoder, RgbaPalette}, extract::extract};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureKind {
	Object,
	Sprite,
}

impl fmt::Display for TextureKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			TextureKind::Object => "object",
			TextureKind::Sprite => "sprite",
		})
	}
}

#[derive(Debug, Error)]
pub enum PackError {
	#[error("{kind} texture {index} uses atlas {atlas_index}, but the level has {num_atlases}")]
	MissingAtlas {
		kind: TextureKind,
		index: usize,
		atlas_index: usize,
		num_atlases: usize,
	},
	#[error("creating {}: {source}", path.display())]
	CreateDir {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("encoding {}: {source}", path.display())]
	Encode {
		path: PathBuf,
		#[source]
		source: image::ImageError,
	},
	#[error("writing {}: {source}", path.display())]
	Write {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

/// MD5 of the atlas's raw indices as 32 uppercase hex digits.
/// Identical atlases from any level get the same name.
pub fn atlas_digest(atlas: &AtlasPage) -> String {
	Md5::digest(atlas.pixels()).iter().map(|b| format!("{:02X}", b)).join("")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
	/// Distinct atlas directories.
	pub directories: usize,
	/// Written, not counting skipped.
	pub object_textures: usize,
	pub sprite_textures: usize,
	/// Rects that extend past their atlas.
	pub skipped: usize,
}

/// Writes every texture of a level into a directory named for the content of its atlas.
pub struct TexturePack<'a> {
	level: &'a Level,
	palette: RgbaPalette,
	/// Parallel to `level.atlases`.
	atlas_dirs: Box<[PathBuf]>,
}

impl<'a> TexturePack<'a> {
	pub fn new(root: &Path, level: &'a Level) -> Self {
		let atlas_dirs = level.atlases.iter().map(|atlas| root.join(atlas_digest(atlas))).collect();
		let palette = RgbaPalette::with_transparent_zero(&level.palette);
		Self { level, palette, atlas_dirs }
	}

	pub fn atlas_dirs(&self) -> &[PathBuf] {
		&self.atlas_dirs
	}

	fn create_dirs(&self) -> Result<usize, PackError> {
		let unique = self.atlas_dirs.iter().unique().collect::<Vec<_>>();
		for (atlas_index, path) in self.atlas_dirs.iter().enumerate() {
			debug!("atlas {} -> {}", atlas_index, path.display());
		}
		for path in &unique {
			//no error if it already exists
			fs::create_dir_all(path).map_err(|source| PackError::CreateDir { path: path.to_path_buf(), source })?;
		}
		Ok(unique.len())
	}

	/// Writes one texture. `Ok(false)` if its rect extends past the atlas and it was skipped.
	fn export_one<E: Encoder + ?Sized>(
		&self,
		encoder: &E,
		kind: TextureKind,
		index: usize,
		atlas_index: usize,
		rect: TexRect,
	) -> Result<bool, PackError> {
		let num_atlases = self.level.atlases.len();
		let atlas = self.level.atlases.get(atlas_index).ok_or(PackError::MissingAtlas { kind, index, atlas_index, num_atlases })?;
		if !rect.fits_atlas() {
			warn!("skipping {} texture {}: {} extends past its atlas", kind, index, rect);
			return Ok(false);
		}
		self.write(encoder, atlas, &self.atlas_dirs[atlas_index], rect)?;
		Ok(true)
	}

	fn write<E: Encoder + ?Sized>(&self, encoder: &E, atlas: &AtlasPage, dir: &Path, rect: TexRect) -> Result<(), PackError> {
		let path = dir.join(format!("{}.{}", rect, encoder.extension()));
		let image = extract(atlas, rect);
		let bytes = match encoder.encode(&image, &self.palette) {
			Ok(bytes) => bytes,
			Err(source) => return Err(PackError::Encode { path, source }),
		};
		if let Err(source) = fs::write(&path, bytes) {
			return Err(PackError::Write { path, source });
		}
		debug!("wrote {}", path.display());
		Ok(())
	}

	/// Stops at the first texture that cannot be written. Textures whose rect extends past
	/// their atlas are skipped with a warning.
	pub fn export<E: Encoder + ?Sized>(&self, encoder: &E) -> Result<ExportSummary, PackError> {
		let mut summary = ExportSummary { directories: self.create_dirs()?, ..Default::default() };
		for (index, texture) in self.level.object_textures.iter().enumerate() {
			match self.export_one(encoder, TextureKind::Object, index, texture.atlas_index(), texture.bounds)? {
				true => summary.object_textures += 1,
				false => summary.skipped += 1,
			}
		}
		for (index, texture) in self.level.sprite_textures.iter().enumerate() {
			match self.export_one(encoder, TextureKind::Sprite, index, texture.atlas_index as usize, texture.rect())? {
				true => summary.sprite_textures += 1,
				false => summary.skipped += 1,
			}
		}
		info!(
			"exported {} object and {} sprite textures into {} directories, skipped {}",
			summary.object_textures, summary.sprite_textures, summary.directories, summary.skipped,
		);
		Ok(summary)
	}
}
