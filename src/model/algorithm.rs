use std::{fmt, str::FromStr};

use crate::{argument::names, error::Error};

/// Key pair algorithms `keygen` can produce.
///
/// `x25519` keys receive encrypted data, `ed25519` keys sign and verify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyAlgorithm {
	#[default]
	X25519,
	Ed25519,
}

impl KeyAlgorithm {
	pub const NAMES: &'static [&'static str] = &["x25519", "ed25519"];

	pub fn name(self) -> &'static str {
		match self {
			Self::X25519 => "x25519",
			Self::Ed25519 => "ed25519",
		}
	}
}

impl fmt::Display for KeyAlgorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for KeyAlgorithm {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"x25519" => Ok(Self::X25519),
			"ed25519" => Ok(Self::Ed25519),
			other => Err(Error::Value {
				name: names::ALGORITHM.into(),
				value: other.into(),
			}),
		}
	}
}
