use std::io::{Read, Result};
use arrayvec::ArrayVec;
use byteorder::{ReadBytesExt, LE};
use crate::{read_boxed_slice, Readable};

//primitive impls

macro_rules! impl_readable_prim {
	($type:ty, $func:ident $(, $($endian:tt)*)?) => {
		impl Readable for $type {
			fn read<R: Read>(reader: &mut R) -> Result<Self> {
				reader.$func$($($endian)*)?()
			}
		}
	};
}

macro_rules! impl_readable_prim_le {
	($type:ty, $func:ident) => {
		impl_readable_prim!($type, $func, ::<LE>);
	};
}

impl_readable_prim!(u8, read_u8);
impl_readable_prim_le!(u16, read_u16);
impl_readable_prim_le!(i16, read_i16);
impl_readable_prim_le!(u32, read_u32);

//array impls

impl<T: Readable, const N: usize> Readable for [T; N] {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		let mut array = ArrayVec::new();
		for _ in 0..N {
			array.push(T::read(reader)?);
		}
		Ok(array.into_inner().ok().unwrap())//reads exactly N items
	}
}

impl<T: Readable, const N: usize> Readable for Box<[T; N]> {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(read_boxed_slice(reader, N)?.try_into().ok().unwrap())//reads exactly N items
	}
}
