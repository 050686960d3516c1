use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Process exit statuses, following BSD `sysexits.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
	Ok = 0,
	Usage = 64,
	DataErr = 65,
	NoInput = 66,
	NoUser = 67,
	NoHost = 68,
	Unavailable = 69,
	Software = 70,
	OsErr = 71,
	OsFile = 72,
	CantCreat = 73,
	IoErr = 74,
	TempFail = 75,
	Protocol = 76,
	NoPerm = 77,
	Config = 78,
}

impl From<ExitCode> for std::process::ExitCode {
	fn from(code: ExitCode) -> Self {
		Self::from(code as u8)
	}
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
	#[error("Argument '{0}' is not defined.")]
	#[diagnostic(code(virgil::argument::not_found))]
	NotFound(String),

	#[error("{0}")]
	#[diagnostic(code(virgil::usage))]
	Parse(String),

	#[error("{0}")]
	ShowUsage(String),

	#[error("{0}")]
	ShowVersion(String),

	#[error("Illegal cast ArgumentValue of type '{found}' to type '{expected}'")]
	#[diagnostic(code(virgil::argument::cast))]
	Cast {
		found: &'static str,
		expected: &'static str,
	},

	#[error("Argument {name} is not of type: {expected}.")]
	#[diagnostic(code(virgil::argument::type_mismatch))]
	Type { name: String, expected: &'static str },

	#[error("Argument '{name}' has unexpected value: '{value}'.")]
	#[diagnostic(code(virgil::argument::value))]
	Value { name: String, value: String },

	#[error("Argument '{name}' is invalid. {message}")]
	#[diagnostic(code(virgil::argument::validation))]
	Validation { name: String, message: String },

	#[error("{0}")]
	#[diagnostic(code(virgil::bug), help("this is a bug in virgil"))]
	Logic(String),

	#[error("File '{}' not found.", .0.display())]
	#[diagnostic(code(virgil::io::not_found))]
	FileNotFound(PathBuf),

	#[error("Can not create file '{}'.", .path.display())]
	#[diagnostic(code(virgil::io::cannot_create))]
	CannotCreate {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("{what}")]
	#[diagnostic(code(virgil::io))]
	Io {
		what: String,
		#[source]
		source: io::Error,
	},

	#[error("config file '{}' is malformed: {message}", .path.display())]
	#[diagnostic(code(virgil::config))]
	Config { path: PathBuf, message: String },

	#[error("Invalid key-value token: '{0}'. Expected format: key=value.")]
	#[diagnostic(code(virgil::argument::key_value))]
	InvalidKeyValue(String),

	#[error("Invalid recipient type: '{kind}'. Expected one of: {expected}.")]
	#[diagnostic(code(virgil::recipient::invalid))]
	InvalidRecipient { kind: String, expected: String },

	#[error("Recipient '{0}' is not found.")]
	#[diagnostic(code(virgil::recipient::not_found))]
	RecipientNotFound(String),

	#[error("Can not decrypt data with any of the given recipients.")]
	#[diagnostic(
		code(virgil::recipient::decryption),
		help("check that the key or password matches one the data was encrypted for")
	)]
	RecipientDecryption,

	#[error("Can not read {what} from the value '{value}'.")]
	#[diagnostic(code(virgil::argument::value_source))]
	ValueSource { what: &'static str, value: String },

	#[error("{0}")]
	#[diagnostic(code(virgil::key))]
	Key(String),

	#[error("{0}")]
	#[diagnostic(code(virgil::crypto))]
	Crypto(String),

	#[error("service request failed: {what}")]
	#[diagnostic(code(virgil::service))]
	Service {
		what: String,
		#[source]
		source: reqwest::Error,
	},

	#[error("Data verification failed.")]
	#[diagnostic(code(virgil::verify))]
	VerificationFailed,
}

impl Error {
	pub fn validation(name: &str, message: impl Into<String>) -> Self {
		Self::Validation {
			name: name.into(),
			message: message.into(),
		}
	}

	pub fn io(what: impl Into<String>, source: io::Error) -> Self {
		Self::Io {
			what: what.into(),
			source,
		}
	}

	pub fn exit_code(&self) -> ExitCode {
		match self {
			Self::ShowUsage(_) | Self::ShowVersion(_) => ExitCode::Ok,
			Self::NotFound(_)
			| Self::Parse(_)
			| Self::Value { .. }
			| Self::Validation { .. }
			| Self::InvalidKeyValue(_)
			| Self::InvalidRecipient { .. } => ExitCode::Usage,
			Self::Type { .. }
			| Self::ValueSource { .. }
			| Self::Key(_)
			| Self::Crypto(_)
			| Self::RecipientDecryption
			| Self::VerificationFailed => ExitCode::DataErr,
			Self::FileNotFound(_) => ExitCode::NoInput,
			Self::RecipientNotFound(_) => ExitCode::NoUser,
			Self::Service { source, .. } if source.is_connect() => ExitCode::NoHost,
			Self::Service { .. } => ExitCode::Unavailable,
			Self::Cast { .. } | Self::Logic(_) => ExitCode::Software,
			Self::CannotCreate { .. } => ExitCode::CantCreat,
			Self::Io { .. } => ExitCode::IoErr,
			Self::Config { .. } => ExitCode::Config,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages() {
		assert_eq!(
			Error::NotFound("input".into()).to_string(),
			"Argument 'input' is not defined."
		);
		assert_eq!(
			Error::Value {
				name: "algorithm".into(),
				value: "rsa".into()
			}
			.to_string(),
			"Argument 'algorithm' has unexpected value: 'rsa'."
		);
	}

	#[test]
	fn exit_codes() {
		assert_eq!(Error::NotFound("x".into()).exit_code(), ExitCode::Usage);
		assert_eq!(Error::ShowUsage(String::new()).exit_code(), ExitCode::Ok);
		assert_eq!(
			Error::FileNotFound("nope".into()).exit_code(),
			ExitCode::NoInput
		);
		assert_eq!(Error::RecipientDecryption.exit_code(), ExitCode::DataErr);
		assert_eq!(Error::Logic("bug".into()).exit_code(), ExitCode::Software);
		assert_eq!(ExitCode::Config as u8, 78);
	}
}
