use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

/// Forward reader over a borrowed buffer. Reads go through `Read`, so `byteorder` and
/// `Readable` work on it directly.
#[derive(Clone, Debug)]
pub struct BinaryCursor<'a> {
	buf: &'a [u8],
	pos: usize,
}

fn eof(wanted: u64, remaining: usize) -> io::Error {
	io::Error::new(ErrorKind::UnexpectedEof, format!("wanted {} bytes, {} remain", wanted, remaining))
}

impl<'a> BinaryCursor<'a> {
	pub fn new(buf: &'a [u8]) -> Self {
		Self { buf, pos: 0 }
	}

	pub fn position(&self) -> u64 {
		self.pos as u64
	}

	/// Bytes left before the end. Zero if the cursor was seeked past the end.
	pub fn remaining(&self) -> usize {
		self.rest().len()
	}

	fn rest(&self) -> &'a [u8] {
		self.buf.get(self.pos..).unwrap_or_default()
	}

	/// Borrow the next `len` bytes. On failure the cursor does not move.
	pub fn take_bytes(&mut self, len: usize) -> io::Result<&'a [u8]> {
		let rest = self.rest();
		if len > rest.len() {
			return Err(eof(len as u64, rest.len()));
		}
		self.pos += len;
		Ok(&rest[..len])
	}

	/// Move forward `len` bytes. On failure the cursor does not move.
	pub fn skip(&mut self, len: u64) -> io::Result<()> {
		let remaining = self.remaining();
		match usize::try_from(len) {
			Ok(len) if len <= remaining => {
				self.pos += len;
				Ok(())
			},
			_ => Err(eof(len, remaining)),
		}
	}
}

impl Read for BinaryCursor<'_> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let rest = self.rest();
		let len = buf.len().min(rest.len());
		buf[..len].copy_from_slice(&rest[..len]);
		self.pos += len;
		Ok(len)
	}
}

impl Seek for BinaryCursor<'_> {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		let (base, offset) = match pos {
			SeekFrom::Start(offset) => (0, offset as i128),
			SeekFrom::Current(offset) => (self.pos as i128, offset as i128),
			SeekFrom::End(offset) => (self.buf.len() as i128, offset as i128),
		};
		let new_pos = usize::try_from(base + offset)
			.map_err(|_| io::Error::new(ErrorKind::InvalidInput, "seek to a negative or overflowing position"))?;
		self.pos = new_pos;
		Ok(new_pos as u64)
	}

	fn stream_position(&mut self) -> io::Result<u64> {
		Ok(self.position())
	}
}
