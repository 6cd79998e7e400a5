use std::{io, path::PathBuf};
use thiserror::Error;

/// A failure that stops decoding.
#[derive(Debug, Error)]
pub enum FormatError {
	#[error("file ends inside {section} (offset {offset})")]
	Truncated {
		section: &'static str,
		/// Byte offset where the section's failing read started.
		offset: u64,
	},
	#[error("reading {section}: {source}")]
	Read {
		section: &'static str,
		#[source]
		source: io::Error,
	},
}

impl FormatError {
	pub(crate) fn from_io(section: &'static str, offset: u64, source: io::Error) -> Self {
		match source.kind() {
			io::ErrorKind::UnexpectedEof => FormatError::Truncated { section, offset },
			_ => FormatError::Read { section, source },
		}
	}
}

/// A mismatch that decoding carries on past, assuming a close relative of the expected format.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormatWarning {
	#[error("unexpected file version {found:#x}, should be {:#x}", crate::VERSION)]
	Version { found: u32 },
	#[error("unexpected value {found} in reserved field, should be 0")]
	Reserved { found: u32 },
}

#[derive(Debug, Error)]
pub enum LoadError {
	#[error("file does not exist: {}", .0.display())]
	NotFound(PathBuf),
	#[error("reading {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error(transparent)]
	Format(#[from] FormatError),
}

/// Receives warnings raised while decoding.
pub trait Report {
	fn warning(&mut self, warning: FormatWarning);
}

/// Collects warnings for later inspection.
impl Report for Vec<FormatWarning> {
	fn warning(&mut self, warning: FormatWarning) {
		self.push(warning);
	}
}

/// Forwards warnings to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReport;

impl Report for LogReport {
	fn warning(&mut self, warning: FormatWarning) {
		log::warn!("{}", warning);
	}
}
