// Copyright 2024-2025 Irreducible Inc.

use maskgen_utils::ensure;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{BlockTag, CompressionHash, Error, MaskParams, Sha256Hash};

/// Stretches a fixed-length [`CompressionHash`] into output of any requested length.
///
/// Block `i` hashes the expanded input `x || tag_i || x` and contributes the first
/// `digest_size / yield_divisor` bytes of the digest. The generator always hashes
/// `osize / block_yield + 1` blocks and truncates the concatenation to `osize` bytes, so a longer
/// output always extends a shorter one for the same input.
#[derive(Debug, Clone)]
pub struct MaskGenerator<H> {
	hash: H,
	tag: BlockTag,
	digest_size: usize,
	block_yield: usize,
}

impl<H: CompressionHash> MaskGenerator<H> {
	pub fn new(hash: H) -> Result<Self, Error> {
		Self::with_params(hash, MaskParams::default())
	}

	pub fn with_params(hash: H, params: MaskParams) -> Result<Self, Error> {
		let MaskParams {
			yield_divisor,
			tag_prefix,
		} = params;
		let digest_size = hash.digest_size();
		let block_yield = digest_size.checked_div(yield_divisor).unwrap_or(0);
		ensure!(
			block_yield > 0,
			Error::BlockYieldTooSmall {
				digest_size,
				yield_divisor,
			}
		);

		debug!(digest_size, block_yield, "configured mask generator");
		Ok(Self {
			hash,
			tag: BlockTag::new(tag_prefix),
			digest_size,
			block_yield,
		})
	}

	pub fn hash(&self) -> &H {
		&self.hash
	}

	pub fn tag(&self) -> &BlockTag {
		&self.tag
	}

	pub fn digest_size(&self) -> usize {
		self.digest_size
	}

	/// Number of output bytes taken from every digest.
	pub fn block_yield(&self) -> usize {
		self.block_yield
	}

	/// Number of hash invocations needed for `osize` bytes of output.
	pub fn block_count(&self, osize: usize) -> Result<usize, Error> {
		let blocks = (osize / self.block_yield)
			.checked_add(1)
			.ok_or(Error::OutputTooLong { requested: osize })?;
		blocks
			.checked_mul(self.block_yield)
			.ok_or(Error::OutputTooLong { requested: osize })?;
		Ok(blocks)
	}

	/// Generate `osize` bytes of output for `input`.
	#[instrument(skip_all, level = "trace", fields(input_len = input.len(), osize = osize))]
	pub fn generate(&self, input: &[u8], osize: usize) -> Result<Vec<u8>, Error> {
		let blocks = self.block_count(osize)?;

		let mut tag = Vec::with_capacity(self.tag.prefix().len() + 2);
		let mut output = Vec::with_capacity(blocks * self.block_yield);
		for i in 0..blocks {
			self.tag.write_index(i, &mut tag);
			let digest = self.hash.hash_parts(&[input, tag.as_slice(), input]);
			debug_assert_eq!(
				digest.len(),
				self.digest_size,
				"hash returned a digest of another size"
			);
			output.extend_from_slice(&digest[..self.block_yield]);
		}

		output.truncate(osize);
		Ok(output)
	}

	/// Fill `out` with the first `out.len()` bytes of output for `input`.
	pub fn generate_into(&self, input: &[u8], out: &mut [u8]) -> Result<(), Error> {
		let output = self.generate(input, out.len())?;
		out.copy_from_slice(&output);
		Ok(())
	}

	/// XOR the output for `input` into `data`. Applying the same mask twice restores `data`.
	pub fn apply_mask(&self, input: &[u8], data: &mut [u8]) -> Result<(), Error> {
		let mask = self.generate(input, data.len())?;
		for (byte, mask_byte) in data.iter_mut().zip(mask) {
			*byte ^= mask_byte;
		}
		Ok(())
	}

	/// Same output as [`Self::generate`], with the blocks hashed on the rayon thread pool.
	#[instrument(skip_all, level = "trace", fields(input_len = input.len(), osize = osize))]
	pub fn generate_par(&self, input: &[u8], osize: usize) -> Result<Vec<u8>, Error> {
		let blocks = self.block_count(osize)?;

		let mut output = vec![0u8; blocks * self.block_yield];
		output
			.par_chunks_mut(self.block_yield)
			.enumerate()
			.for_each_with(Vec::new(), |tag, (i, chunk)| {
				self.tag.write_index(i, tag);
				let digest = self.hash.hash_parts(&[input, tag.as_slice(), input]);
				debug_assert_eq!(digest.len(), self.digest_size);
				chunk.copy_from_slice(&digest[..self.block_yield]);
			});

		output.truncate(osize);
		Ok(output)
	}

	/// Generate `osize` bytes for each of `inputs` in parallel.
	#[instrument(skip_all, level = "debug", fields(n_inputs = inputs.len(), osize = osize))]
	pub fn generate_batch<I>(&self, inputs: &[I], osize: usize) -> Result<Vec<Vec<u8>>, Error>
	where
		I: AsRef<[u8]> + Sync,
	{
		inputs
			.par_iter()
			.map(|input| self.generate(input.as_ref(), osize))
			.collect()
	}
}

impl Default for MaskGenerator<Sha256Hash> {
	fn default() -> Self {
		let hash = Sha256Hash::new();
		let digest_size = hash.digest_size();
		Self {
			hash,
			tag: BlockTag::default(),
			digest_size,
			block_yield: digest_size / MaskParams::default().yield_divisor,
		}
	}
}

/// Generate `osize` bytes of output for `input` with the default SHA-256 generator.
///
/// Fails with [`Error::OutputTooLong`] only when the block buffer for `osize` would not fit in
/// `usize`; every other length succeeds.
pub fn generate_mask(input: impl AsRef<[u8]>, osize: usize) -> Result<Vec<u8>, Error> {
	MaskGenerator::<Sha256Hash>::default().generate(input.as_ref(), osize)
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use hex_literal::hex;
	use proptest::prelude::*;

	use super::*;
	use crate::{FnHash, Groestl256Hash, Ripemd160Hash, Sha512Hash};

	const MAGIC_WORDS: &[u8] = b"The Magic Words are Squeamish Ossifrage";

	/// Digest made of the last eight bytes of the input in reverse order, so the block tag of an
	/// empty input shows up in the output.
	fn reversing_hash(data: &[u8]) -> Vec<u8> {
		let mut digest = data.iter().rev().copied().take(8).collect::<Vec<_>>();
		digest.resize(8, 0);
		digest
	}

	#[test]
	fn test_sha256_vectors() {
		let generator = MaskGenerator::<Sha256Hash>::default();
		assert_eq!(generator.digest_size(), 32);
		assert_eq!(generator.block_yield(), 8);

		assert_eq!(generator.generate(MAGIC_WORDS, 2).unwrap(), hex!("3244"));
		assert_eq!(
			generator.generate(MAGIC_WORDS, 20).unwrap(),
			hex!("32441653a24958bb9a753bb7b33d7b2f50fd03f2")
		);
		assert_eq!(generator.generate(b"", 12).unwrap(), hex!("dd6640ed707c260182985f01"));
	}

	#[test]
	fn test_sha512_vector() {
		let generator = MaskGenerator::new(Sha512Hash::new()).unwrap();
		assert_eq!(generator.block_yield(), 16);
		assert_eq!(
			generator.generate(MAGIC_WORDS, 24).unwrap(),
			hex!("ea53da7d381f456382e3d2802fd79a6f9d11ccdf00f38068")
		);
	}

	#[test]
	fn test_yield_divisor() {
		let params = MaskParams::default().with_yield_divisor(2);
		let generator = MaskGenerator::with_params(Sha256Hash::new(), params).unwrap();
		assert_eq!(generator.block_yield(), 16);
		assert_eq!(
			generator.generate(MAGIC_WORDS, 12).unwrap(),
			hex!("32441653a24958bbedf54297")
		);
	}

	#[test]
	fn test_block_tags_follow_index() {
		let generator = MaskGenerator::new(FnHash(reversing_hash)).unwrap();
		assert_eq!(generator.digest_size(), 8);
		assert_eq!(generator.block_yield(), 2);
		assert_eq!(generator.generate(b"", 6).unwrap(), b"001020");
	}

	#[test]
	fn test_zero_length_output() {
		assert!(generate_mask(MAGIC_WORDS, 0).unwrap().is_empty());
		assert!(generate_mask(b"", 0).unwrap().is_empty());
	}

	#[test]
	fn test_block_boundary_prefix() {
		let generator = MaskGenerator::new(Ripemd160Hash::new()).unwrap();
		assert_eq!(generator.digest_size(), 20);
		assert_eq!(generator.block_yield(), 5);

		let five = generator.generate(MAGIC_WORDS, 5).unwrap();
		let six = generator.generate(MAGIC_WORDS, 6).unwrap();
		assert_eq!(five, hex!("5cac0ba19a"));
		assert_eq!(six, hex!("5cac0ba19a4c"));
		assert_eq!(five[..], six[..5]);
	}

	#[test]
	fn test_hash_invocations() {
		let calls = AtomicUsize::new(0);
		let counting = FnHash(|data: &[u8]| {
			calls.fetch_add(1, Ordering::Relaxed);
			Sha256Hash::new().hash(data)
		});
		let generator = MaskGenerator::new(&counting).unwrap();

		for (osize, expected_calls) in [(0, 1), (7, 1), (8, 2), (16, 3), (17, 3)] {
			calls.store(0, Ordering::Relaxed);
			generator.generate(MAGIC_WORDS, osize).unwrap();
			assert_eq!(calls.load(Ordering::Relaxed), expected_calls, "osize = {osize}");
			assert_eq!(generator.block_count(osize).unwrap(), expected_calls);
		}
	}

	#[test]
	#[cfg(debug_assertions)]
	#[should_panic(expected = "hash returned a digest of another size")]
	fn test_inconsistent_digest_size() {
		let shrinking = FnHash(|data: &[u8]| {
			let digest = Sha256Hash::new().hash(data);
			if data.is_empty() {
				digest
			} else {
				digest[..16].to_vec()
			}
		});
		let generator = MaskGenerator::new(shrinking).unwrap();
		assert_eq!(generator.digest_size(), 32);
		let _ = generator.generate(MAGIC_WORDS, 4);
	}

	#[test]
	fn test_rejects_short_digests() {
		let tiny = FnHash(|data: &[u8]| Sha256Hash::new().hash(data)[..3].to_vec());
		assert!(matches!(
			MaskGenerator::new(tiny),
			Err(Error::BlockYieldTooSmall {
				digest_size: 3,
				yield_divisor: 4,
			})
		));

		let params = MaskParams::default().with_yield_divisor(0);
		assert!(matches!(
			MaskGenerator::with_params(Sha256Hash::new(), params),
			Err(Error::BlockYieldTooSmall { .. })
		));
	}

	#[test]
	fn test_unrepresentable_length() {
		let generator = MaskGenerator::<Sha256Hash>::default();
		assert!(matches!(
			generator.generate(MAGIC_WORDS, usize::MAX),
			Err(Error::OutputTooLong {
				requested: usize::MAX
			})
		));
	}

	#[test]
	fn test_tag_prefix_changes_output() {
		let params = MaskParams::default().with_tag_prefix("TMCG");
		let generator = MaskGenerator::with_params(Sha256Hash::new(), params).unwrap();
		assert_ne!(
			generator.generate(MAGIC_WORDS, 16).unwrap(),
			generate_mask(MAGIC_WORDS, 16).unwrap()
		);
	}

	#[test]
	fn test_generate_into_and_batch() {
		let generator = MaskGenerator::new(Groestl256Hash::new()).unwrap();
		let mut out = [0u8; 37];
		generator.generate_into(MAGIC_WORDS, &mut out).unwrap();
		assert_eq!(out.to_vec(), generator.generate(MAGIC_WORDS, 37).unwrap());

		let inputs = [&b""[..], &b"a"[..], MAGIC_WORDS];
		let batch = generator.generate_batch(&inputs, 37).unwrap();
		assert_eq!(batch.len(), 3);
		for (input, output) in inputs.iter().zip(&batch) {
			assert_eq!(*output, generator.generate(input, 37).unwrap());
		}
		assert_eq!(batch[2], out);
	}

	#[test]
	fn test_apply_mask_is_involution() {
		let generator = MaskGenerator::<Sha256Hash>::default();
		let mut data = *b"attack at dawn";
		generator.apply_mask(b"seed", &mut data).unwrap();
		assert_ne!(&data, b"attack at dawn");
		generator.apply_mask(b"seed", &mut data).unwrap();
		assert_eq!(&data, b"attack at dawn");
	}

	proptest! {
		#[test]
		fn test_length_and_determinism(
			input in prop::collection::vec(any::<u8>(), 0..=128),
			osize in 0usize..=300,
		) {
			let generator = MaskGenerator::<Sha256Hash>::default();
			let first = generator.generate(&input, osize).unwrap();
			prop_assert_eq!(first.len(), osize);
			prop_assert_eq!(&first, &generator.generate(&input, osize).unwrap());
			prop_assert_eq!(&first, &generator.generate_par(&input, osize).unwrap());
		}

		#[test]
		fn test_prefix_stability(
			input in prop::collection::vec(any::<u8>(), 0..=64),
			short in 0usize..=100,
			extra in 0usize..=100,
		) {
			let generator = MaskGenerator::new(Sha512Hash::new()).unwrap();
			let short_output = generator.generate(&input, short).unwrap();
			let long_output = generator.generate(&input, short + extra).unwrap();
			prop_assert_eq!(&short_output[..], &long_output[..short]);
		}

		#[test]
		fn test_sensitivity(
			a in prop::collection::vec(any::<u8>(), 0..=32),
			b in prop::collection::vec(any::<u8>(), 0..=32),
		) {
			prop_assume!(a != b);
			prop_assert_ne!(generate_mask(&a, 16).unwrap(), generate_mask(&b, 16).unwrap());
		}
	}
}
