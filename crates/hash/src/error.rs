// Copyright 2024-2025 Irreducible Inc.

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(
		"a digest of {digest_size} bytes with yield divisor {yield_divisor} leaves no output bytes per block"
	)]
	BlockYieldTooSmall {
		digest_size: usize,
		yield_divisor: usize,
	},
	#[error("requested output length {requested} is not representable")]
	OutputTooLong { requested: usize },
	#[error("block length of a randomness stream must be positive")]
	ZeroBlockLength,
	#[error("no block was accepted after {attempts} attempts")]
	RejectionLimit { attempts: usize },
	#[error("invalid configuration: {0}")]
	InvalidConfig(#[from] maskgen_utils::env::EnvError),
}
