/// A span defined by a minimum and maximum, both inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinMax<T> {
	pub min: T,
	pub max: T,
}

impl<T> MinMax<T> where T: Copy + Ord {
	pub fn new(a: T) -> Self {
		Self { min: a, max: a }
	}
	
	pub fn update(&mut self, a: T) {
		self.min = self.min.min(a);
		self.max = self.max.max(a);
	}
	
	/// Span of a non-empty array.
	pub fn of<const N: usize>(values: [T; N]) -> Self {
		const { assert!(N > 0, "span of an empty array") };
		let mut min_max = MinMax::new(values[0]);
		for a in values {
			min_max.update(a);
		}
		min_max
	}
}
