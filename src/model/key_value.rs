use std::str::FromStr;

use crate::error::Error;

/// A `key=value` assignment, as given to `config --set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
	pub key: String,
	pub value: String,
}

impl FromStr for KeyValue {
	type Err = Error;

	fn from_str(token: &str) -> Result<Self, Self::Err> {
		let parts: Vec<&str> = token.split('=').collect();
		match parts.as_slice() {
			[key, value] if !key.is_empty() && !value.is_empty() => Ok(Self {
				key: key.to_string(),
				value: value.to_string(),
			}),
			_ => Err(Error::InvalidKeyValue(token.into())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn valid() {
		let kv: KeyValue = "alg=rsa".parse().unwrap();
		assert_eq!(kv.key, "alg");
		assert_eq!(kv.value, "rsa");
	}

	#[test]
	fn invalid() {
		for token in ["novalue", "=empty", "key=", "a=b=c", ""] {
			assert!(
				matches!(token.parse::<KeyValue>(), Err(Error::InvalidKeyValue(_))),
				"{token:?} should be rejected"
			);
		}
	}
}
