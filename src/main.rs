use std::{fs, path::PathBuf};
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use glidos_dump::{encode::Png, pack::TexturePack};
use log::info;
use phd_reader::{load_level, LogReport};

/// Dump the textures of a TR1 level as a Glidos texture pack.
#[derive(Parser)]
struct Args {
	/// PHD level file. Atlas directories are created next to it.
	level: PathBuf,
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
	let args = Args::parse();
	let level = load_level(&args.level, &mut LogReport)
		.with_context(|| format!("failed to load {}", args.level.display()))?;
	info!(
		"{}: {} atlases, {} object textures, {} sprite textures",
		args.level.display(), level.atlases.len(), level.object_textures.len(), level.sprite_textures.len(),
	);
	let path = fs::canonicalize(&args.level)?;
	let root = path.parent().context("level path has no parent directory")?;
	TexturePack::new(root, &level).export(&Png)?;
	Ok(())
}
