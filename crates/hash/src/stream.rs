// Copyright 2025 Irreducible Inc.

use maskgen_utils::ensure;
use rand::RngCore;
use tracing::{trace, warn};

use crate::{CompressionHash, Error, MaskGenerator};

/// A deterministic stream of blocks that every party holding the same seed can reproduce.
///
/// Each block is the generator output for the current seed, and is appended to the seed before
/// the next block is drawn. Two parties starting from the same public seed therefore obtain the
/// same sequence, e.g. to derive common random challenges without interaction.
#[derive(Debug, Clone)]
pub struct CommonRandomness<H> {
	generator: MaskGenerator<H>,
	seed: Vec<u8>,
	block_len: usize,
	pending: Vec<u8>,
	position: usize,
}

impl<H: CompressionHash> CommonRandomness<H> {
	pub fn new(
		generator: MaskGenerator<H>,
		seed: impl Into<Vec<u8>>,
		block_len: usize,
	) -> Result<Self, Error> {
		ensure!(block_len > 0, Error::ZeroBlockLength);
		Ok(Self {
			generator,
			seed: seed.into(),
			block_len,
			pending: Vec::new(),
			position: 0,
		})
	}

	/// The seed together with every block drawn so far.
	pub fn seed(&self) -> &[u8] {
		&self.seed
	}

	pub fn block_len(&self) -> usize {
		self.block_len
	}

	pub fn generator(&self) -> &MaskGenerator<H> {
		&self.generator
	}

	/// Draw the next block and append it to the seed.
	pub fn next_block(&mut self) -> Result<Vec<u8>, Error> {
		let block = self.generator.generate(&self.seed, self.block_len)?;
		self.seed.extend_from_slice(&block);
		trace!(seed_len = self.seed.len(), "drew common randomness block");
		Ok(block)
	}

	/// Draw blocks until `accept` returns true for one of them, at most `max_attempts` times.
	///
	/// Rejected blocks still extend the seed, so all parties must apply the same predicate.
	pub fn next_accepted(
		&mut self,
		mut accept: impl FnMut(&[u8]) -> bool,
		max_attempts: usize,
	) -> Result<Vec<u8>, Error> {
		for _ in 0..max_attempts {
			let block = self.next_block()?;
			if accept(&block) {
				return Ok(block);
			}
		}

		warn!(max_attempts, "no common randomness block was accepted");
		Err(Error::RejectionLimit {
			attempts: max_attempts,
		})
	}
}

/// Byte-level access to the stream. Bytes are served from whole blocks in order; a block that is
/// only partially consumed is kept for the next call, and [`CommonRandomness::next_block`] draws
/// past it.
impl<H: CompressionHash> RngCore for CommonRandomness<H> {
	fn next_u32(&mut self) -> u32 {
		let mut bytes = [0u8; 4];
		self.fill_bytes(&mut bytes);
		u32::from_le_bytes(bytes)
	}

	fn next_u64(&mut self) -> u64 {
		let mut bytes = [0u8; 8];
		self.fill_bytes(&mut bytes);
		u64::from_le_bytes(bytes)
	}

	fn fill_bytes(&mut self, dest: &mut [u8]) {
		if let Err(err) = self.try_fill_bytes(dest) {
			panic!("common randomness stream failed: {err}");
		}
	}

	fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
		let mut filled = 0;
		while filled < dest.len() {
			if self.position == self.pending.len() {
				self.pending = self.next_block().map_err(rand::Error::new)?;
				self.position = 0;
			}

			let n = (self.pending.len() - self.position).min(dest.len() - filled);
			dest[filled..filled + n]
				.copy_from_slice(&self.pending[self.position..self.position + n]);
			self.position += n;
			filled += n;
		}
		Ok(())
	}
}
