// Copyright 2024 Irreducible Inc.

use std::{env, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("environment variable {name} has invalid value {value:?}")]
pub struct EnvError {
	pub name: String,
	pub value: String,
}

/// Read boolean flag from the environment variable.
pub fn boolean_env_flag_set(flag: &str) -> bool {
	match env::var(flag) {
		Ok(val) => ["1", "on", "ON", "true", "TRUE", "yes", "YES"].contains(&val.as_str()),
		Err(_) => false,
	}
}

/// Read and parse an environment variable.
///
/// Returns `Ok(None)` when the variable is unset or not valid unicode, and an error when it is set
/// to something that `T` cannot parse.
pub fn parse_env_var<T: FromStr>(name: &str) -> Result<Option<T>, EnvError> {
	match env::var(name) {
		Ok(value) => parse_value(name, &value).map(Some),
		Err(_) => Ok(None),
	}
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T, EnvError> {
	value.trim().parse().map_err(|_| EnvError {
		name: name.to_string(),
		value: value.to_string(),
	})
}
