use std::path::PathBuf;

use clap::Command;
use tracing::debug;

use super::{
	Argument, ArgumentImportance, ArgumentParseOptions, ArgumentRules, ArgumentValue, names,
	source::ArgumentSourceChain,
	validation::{ArgumentValidation, ArgumentValidationHub as Hub},
	value_source::ArgumentValueSourceChain,
};
use crate::{
	config::AppConfig,
	error::Error,
	model::{
		Card, CardProperty, CardScope, FileDataSink, FileDataSource, KeyAlgorithm, KeyValue, Password, PrivateKey,
		Recipient,
	},
	service::HttpCardService,
};

/// Token kinds accepted for a signature sender.
const SENDER_KINDS: &[&str] = &["pubkey", "vcard", "email", "id"];

/// What commands read their arguments through.
///
/// Each getter looks the argument up by name in the source chain, validates
/// it and converts it with the value-source chain.
pub struct ArgumentIo {
	sources: ArgumentSourceChain,
	values: ArgumentValueSourceChain,
}

impl ArgumentIo {
	pub fn new(sources: ArgumentSourceChain, values: ArgumentValueSourceChain) -> Self {
		Self { sources, values }
	}

	/// Apply a usage grammar to every source. Called once by the hub and once
	/// more by the command it dispatches to.
	pub fn configure_usage(
		&mut self,
		usage: &Command,
		options: ArgumentParseOptions,
	) -> Result<(), Error> {
		self.sources.init(usage, options)
	}

	pub fn rules(&self) -> ArgumentRules {
		self.sources.rules()
	}

	fn read(
		&self,
		name: &str,
		importance: ArgumentImportance,
		validation: &impl ArgumentValidation,
	) -> Result<Argument, Error> {
		let argument = self.sources.read(name, importance)?;
		validation.validate(name, &argument, importance)?;
		Ok(argument)
	}

	fn read_list(
		&self,
		name: &str,
		importance: ArgumentImportance,
		validation: &impl ArgumentValidation,
	) -> Result<Argument, Error> {
		let mut argument = self.sources.read(name, importance)?;
		argument.parse();
		validation.validate_list(name, &argument, importance)?;
		Ok(argument)
	}

	fn read_path(&self, name: &str) -> Result<Option<PathBuf>, Error> {
		let argument = self.read(name, ArgumentImportance::Optional, &Hub::is_text())?;
		Ok(match argument.as_value() {
			ArgumentValue::String(ref path) => Some(PathBuf::from(path)),
			_ => None,
		})
	}

	fn read_text(&self, name: &str, importance: ArgumentImportance) -> Result<Option<String>, Error> {
		let argument = self.read(name, importance, &Hub::is_not_empty())?;
		match argument.as_value() {
			ArgumentValue::Empty => Ok(None),
			value => value.to_text().map(Some),
		}
	}

	fn read_texts(&self, name: &str) -> Result<Vec<String>, Error> {
		let argument = self.sources.read(name, ArgumentImportance::Required)?;
		Hub::is_not_empty().validate_list(name, &argument, ArgumentImportance::Required)?;
		argument
			.as_list()
			.iter()
			.map(ArgumentValue::to_text)
			.collect()
	}

	pub fn get_command(&self, valid: &[&str]) -> Result<String, Error> {
		let argument = self.read(
			names::COMMAND,
			ArgumentImportance::Required,
			&Hub::is_enum(valid)?,
		)?;
		argument.as_value().to_text()
	}

	pub fn get_key_algorithm(&self) -> Result<KeyAlgorithm, Error> {
		let argument = self.read(
			names::ALGORITHM,
			ArgumentImportance::Required,
			&Hub::is_enum(KeyAlgorithm::NAMES)?,
		)?;
		self.values.read_key_algorithm(&argument.as_value())
	}

	/// Stdin when no input was given.
	pub fn get_input(&self) -> Result<FileDataSource, Error> {
		self.read_path(names::INPUT).map(FileDataSource::new)
	}

	/// Stdout when no output was given.
	pub fn get_output(&self) -> Result<FileDataSink, Error> {
		self.read_path(names::OUTPUT).map(FileDataSink::new)
	}

	/// The password protecting a private key. `--no-password` yields the empty
	/// password, which leaves keys unprotected.
	pub fn get_key_password(&self) -> Result<Password, Error> {
		let no_password = self
			.sources
			.read(names::NO_PASSWORD, ArgumentImportance::Optional)?
			.as_value()
			.as_optional_bool();
		if no_password {
			debug!("key password disabled");
			return Ok(Password::empty());
		}

		let argument = self
			.sources
			.read_secure(names::PRIVATE_KEY_PASSWORD, ArgumentImportance::Required)?;
		Hub::is_not_empty().validate(
			names::PRIVATE_KEY_PASSWORD,
			&argument,
			ArgumentImportance::Required,
		)?;
		self.values.read_password(&argument.as_value())
	}

	/// The key password when one was given, without requiring it.
	pub fn get_key_password_optional(&self) -> Result<Option<Password>, Error> {
		let argument = self
			.sources
			.read_secure(names::PRIVATE_KEY_PASSWORD, ArgumentImportance::Optional)?;
		if argument.is_empty() {
			return Ok(None);
		}
		Hub::is_not_empty().validate(
			names::PRIVATE_KEY_PASSWORD,
			&argument,
			ArgumentImportance::Optional,
		)?;
		self.values.read_password(&argument.as_value()).map(Some)
	}

	/// Absent when data and content info travel together.
	pub fn get_content_info_input(&self) -> Result<Option<FileDataSource>, Error> {
		Ok(self
			.read_path(names::CONTENT_INFO)?
			.map(|path| FileDataSource::new(Some(path))))
	}

	pub fn get_content_info_output(&self) -> Result<Option<FileDataSink>, Error> {
		Ok(self
			.read_path(names::CONTENT_INFO)?
			.map(|path| FileDataSink::new(Some(path))))
	}

	fn recipient(&self, value: &ArgumentValue, kinds: &[&str]) -> Result<Recipient, Error> {
		let kind = value.key()?;
		if !kinds.contains(&kind) {
			return Err(Error::InvalidRecipient {
				kind: kind.into(),
				expected: kinds.join(", "),
			});
		}

		debug!(%kind, "reading recipient");
		Ok(match kind {
			"password" => Recipient::Password(self.values.read_password(value)?),
			"pubkey" => Recipient::PublicKey(self.values.read_public_key(value)?),
			"privkey" => Recipient::PrivateKey(self.values.read_private_key(value)?),
			"vcard" => Recipient::Cards(self.values.read_cards(value)?),
			"email" => Recipient::Email(value.value()?.into()),
			"id" => Recipient::CardId(value.value()?.into()),
			other => {
				return Err(Error::Logic(format!("unhandled recipient kind {other}")));
			}
		})
	}

	fn recipients(&self, name: &str, kinds: &[&str]) -> Result<Vec<Recipient>, Error> {
		let validation = Hub::is_key_value().with_key(Hub::is_enum(kinds)?);
		let argument = self.read_list(name, ArgumentImportance::Required, &validation)?;
		argument
			.as_list()
			.iter()
			.map(|value| self.recipient(value, kinds))
			.collect()
	}

	/// Who to encrypt for: `password:`, `pubkey:`, `email:`, `vcard:` or `id:` tokens.
	pub fn get_recipients(&self) -> Result<Vec<Recipient>, Error> {
		self.recipients(names::RECIPIENT, Recipient::ENCRYPT_KINDS)
	}

	/// What to try decrypting with: `privkey:` or `password:` tokens.
	pub fn get_decrypt_recipients(&self) -> Result<Vec<Recipient>, Error> {
		self.recipients(names::KEYPASS, Recipient::DECRYPT_KINDS)
	}

	/// Whose key a signature is checked against.
	pub fn get_sender(&self) -> Result<Vec<Recipient>, Error> {
		self.recipients(names::SENDER, SENDER_KINDS)
	}

	pub fn get_private_key(&self) -> Result<PrivateKey, Error> {
		let argument = self.read(
			names::PRIVATE_KEY,
			ArgumentImportance::Required,
			&Hub::is_not_empty(),
		)?;
		self.values.read_private_key(&argument.as_value())
	}

	pub fn get_signature_input(&self) -> Result<FileDataSource, Error> {
		let argument = self.read(
			names::SIGNATURE,
			ArgumentImportance::Required,
			&Hub::is_text(),
		)?;
		Ok(FileDataSource::new(Some(PathBuf::from(
			argument.as_value().as_string()?,
		))))
	}

	pub fn get_card_ids(&self) -> Result<Vec<String>, Error> {
		self.read_texts(names::CARD_ID)
	}

	pub fn get_identities(&self) -> Result<Vec<String>, Error> {
		self.read_texts(names::IDENTITY)
	}

	pub fn get_identity_type(&self) -> Result<String, Error> {
		self.read_text(names::IDENTITY_TYPE, ArgumentImportance::Required)?
			.ok_or_else(|| Error::NotFound(names::IDENTITY_TYPE.into()))
	}

	pub fn get_scope(&self) -> Result<CardScope, Error> {
		let argument = self.read(
			names::SCOPE,
			ArgumentImportance::Required,
			&Hub::is_enum(CardScope::NAMES)?,
		)?;
		argument.as_value().as_string()?.parse()
	}

	/// The card properties to show, each named once or more.
	pub fn get_card_properties(&self) -> Result<Vec<CardProperty>, Error> {
		let argument = self.sources.read(names::PROPERTY, ArgumentImportance::Required)?;
		Hub::is_enum(CardProperty::NAMES)?.validate_list(
			names::PROPERTY,
			&argument,
			ArgumentImportance::Required,
		)?;
		argument
			.as_list()
			.iter()
			.map(|value| value.as_string()?.parse())
			.collect()
	}

	/// Cards given as input, from a file or inline JSON; `None` means stdin.
	pub fn get_input_cards(&self) -> Result<Option<Vec<Card>>, Error> {
		let argument = self.read(names::INPUT, ArgumentImportance::Optional, &Hub::is_text())?;
		if argument.is_empty() {
			return Ok(None);
		}
		self.values.read_cards(&argument.as_value()).map(Some)
	}

	pub fn get_application_token(&self) -> Result<Option<String>, Error> {
		self.read_text(names::APPLICATION_TOKEN, ArgumentImportance::Optional)
	}

	pub fn is_quiet(&self) -> Result<bool, Error> {
		Ok(self
			.sources
			.read(names::QUIET, ArgumentImportance::Optional)?
			.as_value()
			.as_optional_bool())
	}

	pub fn is_path_only(&self) -> Result<bool, Error> {
		Ok(self
			.sources
			.read(names::PATH, ArgumentImportance::Optional)?
			.as_value()
			.as_optional_bool())
	}

	/// `key=value` assignments for the app config.
	pub fn get_settings(&self) -> Result<Vec<KeyValue>, Error> {
		let argument = self.sources.read(names::SET, ArgumentImportance::Optional)?;
		argument
			.as_list()
			.iter()
			.map(|value| value.to_text()?.parse())
			.collect()
	}

	/// A card service client, authenticated with the token given for this run
	/// or else the configured one.
	pub fn get_client(&self, config: &AppConfig) -> Result<HttpCardService, Error> {
		let token = self.get_application_token()?;
		let token = token.as_deref().unwrap_or(config.access_token());
		HttpCardService::new(config.public_key_service(), token)
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use age::secrecy::ExposeSecret;
	use clap::{Arg, ArgAction};

	use super::*;
	use crate::argument::{
		source::{ArgumentCommandLineSource, ArgumentDefaultsSource},
		value_source::{ArgumentValueFileSource, ArgumentValueParserSource},
	};

	fn usage() -> Command {
		Command::new("test")
			.arg(Arg::new(names::INPUT).short('i').long("input"))
			.arg(Arg::new(names::ALGORITHM).long("algorithm"))
			.arg(
				Arg::new(names::PRIVATE_KEY_PASSWORD)
					.short('p')
					.long("private-key-password"),
			)
			.arg(
				Arg::new(names::NO_PASSWORD)
					.long("no-password")
					.action(ArgAction::SetTrue),
			)
			.arg(
				Arg::new(names::SET)
					.long("set")
					.action(ArgAction::Append),
			)
			.arg(
				Arg::new(names::PROPERTY)
					.short('s')
					.action(ArgAction::Append),
			)
			.arg(Arg::new(names::RECIPIENT).action(ArgAction::Append))
	}

	fn io(argv: &[&str]) -> ArgumentIo {
		let mut sources = ArgumentSourceChain::new();
		sources
			.append_source(ArgumentCommandLineSource::new(argv.iter().copied()))
			.append_source(ArgumentDefaultsSource::default());
		let mut values = ArgumentValueSourceChain::new();
		values
			.append_source(Rc::new(ArgumentValueFileSource))
			.append_source(Rc::new(ArgumentValueParserSource));

		let mut io = ArgumentIo::new(sources, values);
		io.configure_usage(&usage(), ArgumentParseOptions::default())
			.unwrap();
		io
	}

	#[test]
	fn input_and_output_default_to_the_console() {
		let io = io(&["test"]);
		assert_eq!(io.get_input().unwrap(), FileDataSource::Stdin);
		assert_eq!(io.get_output().unwrap(), FileDataSink::Stdout);

		let io = self::io(&["test", "-i", "plain.txt"]);
		assert_eq!(
			io.get_input().unwrap(),
			FileDataSource::File("plain.txt".into())
		);
	}

	#[test]
	fn algorithm_from_defaults_and_command_line() {
		assert_eq!(io(&["test"]).get_key_algorithm().unwrap(), KeyAlgorithm::X25519);
		assert_eq!(
			io(&["test", "--algorithm", "ed25519"])
				.get_key_algorithm()
				.unwrap(),
			KeyAlgorithm::Ed25519
		);

		let err = io(&["test", "--algorithm", "rsa"])
			.get_key_algorithm()
			.unwrap_err();
		assert_eq!(
			err.to_string(),
			"Argument 'algorithm' is invalid. Expected one of the values {x25519, ed25519}, but got 'rsa'."
		);
	}

	#[test]
	fn key_password() {
		let password = io(&["test", "-p", "hunter2"]).get_key_password().unwrap();
		assert_eq!(password.secret().expose_secret(), "hunter2");

		assert!(
			io(&["test", "--no-password"])
				.get_key_password()
				.unwrap()
				.is_empty()
		);

		assert!(matches!(
			io(&["test"]).get_key_password(),
			Err(Error::NotFound(_))
		));
		assert!(io(&["test"]).get_key_password_optional().unwrap().is_none());
		let password = io(&["test", "-p", "hunter2"])
			.get_key_password_optional()
			.unwrap()
			.unwrap();
		assert_eq!(password.secret().expose_secret(), "hunter2");
	}

	#[test]
	fn card_properties() {
		let properties = io(&["test", "-s", "scope", "-s", "id"])
			.get_card_properties()
			.unwrap();
		assert_eq!(properties, [CardProperty::Scope, CardProperty::Id]);

		assert!(matches!(
			io(&["test", "-s", "colour"]).get_card_properties(),
			Err(Error::Validation { .. })
		));
		assert!(matches!(
			io(&["test"]).get_card_properties(),
			Err(Error::NotFound(_))
		));
	}

	#[test]
	fn cards_from_input() {
		assert!(io(&["test"]).get_input_cards().unwrap().is_none());

		let json = r#"{"id":"c1","identity":"bob@example.com","identity_type":"email","public_key":"x"}"#;
		let cards = io(&["test", "-i", json]).get_input_cards().unwrap().unwrap();
		assert_eq!(cards[0].identity, "bob@example.com");
	}

	#[test]
	fn recipients() {
		let io = io(&[
			"test",
			"password:hunter2",
			"email:bob@example.com",
			"id:c0ffee",
		]);
		let kinds: Vec<_> = io
			.get_recipients()
			.unwrap()
			.iter()
			.map(Recipient::kind)
			.collect();
		assert_eq!(kinds, vec!["password", "email", "id"]);
	}

	#[test]
	fn bad_recipients() {
		let err = io(&["test", "carrier:pigeon"]).get_recipients().unwrap_err();
		assert!(matches!(err, Error::Validation { .. }));
		assert!(err.to_string().contains("Key validation:"));

		let err = io(&["test", "plain"]).get_recipients().unwrap_err();
		assert!(
			err.to_string()
				.contains("Expected KeyValue, but found value of the type string.")
		);

		assert!(matches!(
			io(&["test"]).get_recipients(),
			Err(Error::NotFound(_))
		));

		let err = io(&["test", "email:bob@example.com"])
			.get_decrypt_recipients();
		assert!(err.is_err());
	}

	#[test]
	fn settings() {
		let io = io(&["test", "--set", "token=abc", "--set", "identity-service=http://x"]);
		let settings = io.get_settings().unwrap();
		assert_eq!(settings.len(), 2);
		assert_eq!(settings[0].key, "token");
		assert_eq!(settings[0].value, "abc");

		assert!(matches!(
			self::io(&["test", "--set", "novalue"]).get_settings(),
			Err(Error::InvalidKeyValue(_))
		));
	}
}
