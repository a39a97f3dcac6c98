// Copyright 2023-2025 Irreducible Inc.

//! Variable-length pseudorandom output built on a fixed-length cryptographic hash.
//!
//! The construction follows the ideas of Bellare and Rogaway: the input `x` is expanded into
//! `x || tag_i || x` for consecutive block indices `i`, each expansion is hashed, and a fixed
//! fraction of every digest is concatenated until the requested length is covered.

mod error;
pub mod hasher;
pub mod mask;
pub mod params;
pub mod stream;
pub mod tag;

pub use error::*;
pub use hasher::*;
pub use mask::*;
pub use params::*;
pub use stream::*;
pub use tag::*;
