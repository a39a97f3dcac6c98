// Copyright 2024 Irreducible Inc.

/// Prefix of the block tags, kept for compatibility with libTMCG.
pub const DEFAULT_TAG_PREFIX: &[u8] = b"libTMCG";

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Domain-separation label inserted between the two copies of the input in every expanded block.
///
/// The label of block `i` is the prefix followed by `i` in lowercase hexadecimal, zero-padded to
/// two digits. Indices from `0x100` on take as many digits as they need, which changes the length
/// of the expanded block, so labels never coincide for two different indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTag {
	prefix: Vec<u8>,
}

impl BlockTag {
	pub fn new(prefix: impl Into<Vec<u8>>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}

	pub fn prefix(&self) -> &[u8] {
		&self.prefix
	}

	/// Replace the contents of `buf` with the label of block `index`.
	pub fn write_index(&self, index: usize, buf: &mut Vec<u8>) {
		buf.clear();
		buf.extend_from_slice(&self.prefix);

		let n_digits = (usize::BITS - index.leading_zeros()).div_ceil(4).max(2);
		buf.extend((0..n_digits).rev().map(|digit| {
			let nibble = (index >> (4 * digit)) & 0xf;
			HEX_DIGITS[nibble]
		}));
	}

	pub fn for_index(&self, index: usize) -> Vec<u8> {
		let mut buf = Vec::with_capacity(self.prefix.len() + 2);
		self.write_index(index, &mut buf);
		buf
	}
}

impl Default for BlockTag {
	fn default() -> Self {
		Self::new(DEFAULT_TAG_PREFIX)
	}
}
