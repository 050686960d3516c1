//! Persisted application settings: service access token and endpoints.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::Error, model::KeyValue};

/// Used when no token is configured; only grants access to public cards.
pub const DEFAULT_ACCESS_TOKEN: &str = "AT.public-read-only";

pub const DEFAULT_IDENTITY_SERVICE: &str = "https://identity.virgilsecurity.com";
pub const DEFAULT_PUBLIC_KEY_SERVICE: &str = "https://cards.virgilsecurity.com";
pub const DEFAULT_PRIVATE_KEY_SERVICE: &str = "https://keys-private.virgilsecurity.com";

const APP_DIR: &str = "virgil-cli";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
	pub access: Access,
	pub services: Services,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Access {
	pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Services {
	pub identity: Option<String>,
	pub public_key: Option<String>,
	pub private_key: Option<String>,
}

impl AppConfig {
	/// Keys accepted by [`AppConfig::set`].
	pub const KEYS: &'static [&'static str] = &[
		"token",
		"identity-service",
		"public-key-service",
		"private-key-service",
	];

	/// `<config dir>/virgil-cli`, if the platform has a config dir.
	pub fn dir() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join(APP_DIR))
	}

	pub fn default_path() -> Option<PathBuf> {
		Self::dir().map(|dir| dir.join("config.toml"))
	}

	/// Load settings; a missing file gives the defaults.
	pub async fn load(path: &Path) -> Result<Self, Error> {
		let text = match tokio::fs::read_to_string(path).await {
			Ok(text) => text,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				debug!(?path, "no app config, using defaults");
				return Ok(Self::default());
			}
			Err(err) => return Err(Error::io(format!("reading {}", path.display()), err)),
		};

		toml::from_str(&text).map_err(|err| Error::Config {
			path: path.into(),
			message: err.to_string(),
		})
	}

	pub async fn save(&self, path: &Path) -> Result<(), Error> {
		if let Some(dir) = path.parent() {
			tokio::fs::create_dir_all(dir)
				.await
				.map_err(|err| Error::io(format!("creating {}", dir.display()), err))?;
		}

		let text = toml::to_string_pretty(self)
			.map_err(|err| Error::Logic(format!("serialising app config: {err}")))?;
		tokio::fs::write(path, text)
			.await
			.map_err(|source| Error::CannotCreate {
				path: path.into(),
				source,
			})
	}

	pub fn set(&mut self, entry: &KeyValue) -> Result<(), Error> {
		let slot = match entry.key.as_str() {
			"token" => &mut self.access.token,
			"identity-service" => &mut self.services.identity,
			"public-key-service" => &mut self.services.public_key,
			"private-key-service" => &mut self.services.private_key,
			other => {
				return Err(Error::Value {
					name: crate::argument::names::SET.into(),
					value: other.into(),
				});
			}
		};
		*slot = Some(entry.value.clone());
		Ok(())
	}

	pub fn access_token(&self) -> &str {
		self.access.token.as_deref().unwrap_or(DEFAULT_ACCESS_TOKEN)
	}

	pub fn identity_service(&self) -> &str {
		self.services
			.identity
			.as_deref()
			.unwrap_or(DEFAULT_IDENTITY_SERVICE)
	}

	pub fn public_key_service(&self) -> &str {
		self.services
			.public_key
			.as_deref()
			.unwrap_or(DEFAULT_PUBLIC_KEY_SERVICE)
	}

	pub fn private_key_service(&self) -> &str {
		self.services
			.private_key
			.as_deref()
			.unwrap_or(DEFAULT_PRIVATE_KEY_SERVICE)
	}
}
