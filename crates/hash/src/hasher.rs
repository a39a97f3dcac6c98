// Copyright 2023-2024 Irreducible Inc.

use std::{fmt, marker::PhantomData, sync::Arc};

use digest::Digest;

/// Trait representing a fixed-output-length cryptographic hash over byte strings.
///
/// This is the compression hash consumed by the mask generator. Implementations must be
/// deterministic, accept any input including the empty one, and always return digests of the
/// same length.
pub trait CompressionHash: Send + Sync {
	/// Hash the concatenation of `parts`.
	fn hash_parts(&self, parts: &[&[u8]]) -> Vec<u8>;

	fn hash(&self, data: &[u8]) -> Vec<u8> {
		self.hash_parts(&[data])
	}

	/// The digest length in bytes, defined as the length of the digest of the empty string.
	fn digest_size(&self) -> usize {
		self.hash(&[]).len()
	}
}

/// Adapter exposing a [`digest::Digest`] implementation as a [`CompressionHash`].
pub struct DigestHash<D> {
	_marker: PhantomData<fn() -> D>,
}

/// The hash libTMCG uses, with 20-byte digests.
pub type Ripemd160Hash = DigestHash<ripemd::Ripemd160>;
pub type Sha256Hash = DigestHash<sha2::Sha256>;
pub type Sha512Hash = DigestHash<sha2::Sha512>;
pub type Groestl256Hash = DigestHash<groestl_crypto::Groestl256>;

impl<D> DigestHash<D> {
	pub const fn new() -> Self {
		Self {
			_marker: PhantomData,
		}
	}
}

impl<D> Default for DigestHash<D> {
	fn default() -> Self {
		Self::new()
	}
}

impl<D> Clone for DigestHash<D> {
	fn clone(&self) -> Self {
		Self::new()
	}
}

impl<D> Copy for DigestHash<D> {}

impl<D> fmt::Debug for DigestHash<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DigestHash")
			.field("algorithm", &std::any::type_name::<D>())
			.finish()
	}
}

impl<D: Digest> CompressionHash for DigestHash<D> {
	fn hash_parts(&self, parts: &[&[u8]]) -> Vec<u8> {
		let mut hasher = D::new();
		for part in parts {
			Digest::update(&mut hasher, part);
		}
		hasher.finalize().to_vec()
	}

	fn digest_size(&self) -> usize {
		<D as Digest>::output_size()
	}
}

/// Adapter exposing a plain function as a [`CompressionHash`].
///
/// The digest size is taken from the digest of the empty string, so the function must return
/// digests of one fixed length. A mask generator panics on a digest shorter than that.
#[derive(Clone)]
pub struct FnHash<F>(pub F);

impl<F> fmt::Debug for FnHash<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("FnHash")
	}
}

impl<F> CompressionHash for FnHash<F>
where
	F: Fn(&[u8]) -> Vec<u8> + Send + Sync,
{
	fn hash_parts(&self, parts: &[&[u8]]) -> Vec<u8> {
		match parts {
			[single] => (self.0)(single),
			_ => (self.0)(&parts.concat()),
		}
	}
}

impl<H: CompressionHash + ?Sized> CompressionHash for &H {
	fn hash_parts(&self, parts: &[&[u8]]) -> Vec<u8> {
		(**self).hash_parts(parts)
	}

	fn hash(&self, data: &[u8]) -> Vec<u8> {
		(**self).hash(data)
	}

	fn digest_size(&self) -> usize {
		(**self).digest_size()
	}
}

impl<H: CompressionHash + ?Sized> CompressionHash for Box<H> {
	fn hash_parts(&self, parts: &[&[u8]]) -> Vec<u8> {
		(**self).hash_parts(parts)
	}

	fn hash(&self, data: &[u8]) -> Vec<u8> {
		(**self).hash(data)
	}

	fn digest_size(&self) -> usize {
		(**self).digest_size()
	}
}

impl<H: CompressionHash + ?Sized> CompressionHash for Arc<H> {
	fn hash_parts(&self, parts: &[&[u8]]) -> Vec<u8> {
		(**self).hash_parts(parts)
	}

	fn hash(&self, data: &[u8]) -> Vec<u8> {
		(**self).hash(data)
	}

	fn digest_size(&self) -> usize {
		(**self).digest_size()
	}
}

/// SHA-256 digest of `data`.
pub fn hash(data: impl AsRef<[u8]>) -> Vec<u8> {
	Sha256Hash::new().hash(data.as_ref())
}
