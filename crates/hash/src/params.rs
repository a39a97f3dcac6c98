// Copyright 2024-2025 Irreducible Inc.

use maskgen_utils::env::parse_env_var;

use crate::{tag::DEFAULT_TAG_PREFIX, Error};

pub const YIELD_DIVISOR_ENV: &str = "MASKGEN_YIELD_DIVISOR";
pub const TAG_PREFIX_ENV: &str = "MASKGEN_TAG_PREFIX";

/// Tunable parameters of a [`crate::MaskGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskParams {
	/// Every block contributes `digest_size / yield_divisor` bytes of output.
	///
	/// The default of 4 keeps only a quarter of each digest, matching libTMCG output.
	pub yield_divisor: usize,
	pub tag_prefix: Vec<u8>,
}

impl Default for MaskParams {
	fn default() -> Self {
		Self {
			yield_divisor: 4,
			tag_prefix: DEFAULT_TAG_PREFIX.to_vec(),
		}
	}
}

impl MaskParams {
	/// Defaults overridden by `MASKGEN_YIELD_DIVISOR` and `MASKGEN_TAG_PREFIX` when they are set.
	pub fn from_env() -> Result<Self, Error> {
		let yield_divisor = parse_env_var::<usize>(YIELD_DIVISOR_ENV)?;
		let tag_prefix = parse_env_var::<String>(TAG_PREFIX_ENV)?;
		Ok(Self::default().overlay(yield_divisor, tag_prefix))
	}

	fn overlay(self, yield_divisor: Option<usize>, tag_prefix: Option<String>) -> Self {
		Self {
			yield_divisor: yield_divisor.unwrap_or(self.yield_divisor),
			tag_prefix: tag_prefix.map_or(self.tag_prefix, String::into_bytes),
		}
	}

	pub fn with_yield_divisor(mut self, yield_divisor: usize) -> Self {
		self.yield_divisor = yield_divisor;
		self
	}

	pub fn with_tag_prefix(mut self, tag_prefix: impl Into<Vec<u8>>) -> Self {
		self.tag_prefix = tag_prefix.into();
		self
	}
}
