//! Card service client.

use reqwest::{
	Client, Response, StatusCode,
	header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
	error::Error,
	model::{Card, CardScope},
};

/// What to look cards up by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
	pub identities: Vec<String>,
	pub identity_type: String,
	pub scope: CardScope,
}

impl SearchCriteria {
	pub fn email(address: &str) -> Self {
		Self {
			identities: vec![address.into()],
			identity_type: "email".into(),
			scope: CardScope::Global,
		}
	}
}

/// Lookup of identity cards.
#[allow(async_fn_in_trait)]
pub trait CardService {
	async fn get_card(&self, id: &str) -> Result<Card, Error>;
	async fn search_cards(&self, criteria: &SearchCriteria) -> Result<Vec<Card>, Error>;
}

/// [`CardService`] over the HTTP API of the public-key service.
#[derive(Debug, Clone)]
pub struct HttpCardService {
	client: Client,
	base_url: String,
}

impl HttpCardService {
	pub fn new(base_url: &str, token: &str) -> Result<Self, Error> {
		let mut headers = HeaderMap::new();
		let mut auth = HeaderValue::from_str(&format!("VIRGIL {token}"))
			.map_err(|_| Error::Value {
				name: crate::argument::names::APPLICATION_TOKEN.into(),
				value: "<hidden>".into(),
			})?;
		auth.set_sensitive(true);
		headers.insert(AUTHORIZATION, auth);

		let client = Client::builder()
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.default_headers(headers)
			.build()
			.map_err(|source| Error::Service {
				what: "building the http client".into(),
				source,
			})?;

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').into(),
		})
	}

	fn checked(response: Response, what: &str) -> Result<Response, Error> {
		response.error_for_status().map_err(|source| Error::Service {
			what: what.into(),
			source,
		})
	}
}

impl CardService for HttpCardService {
	#[instrument(level = "debug", skip(self))]
	async fn get_card(&self, id: &str) -> Result<Card, Error> {
		let url = format!("{}/v4/card/{id}", self.base_url);
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|source| Error::Service {
				what: format!("requesting card {id}"),
				source,
			})?;

		if response.status() == StatusCode::NOT_FOUND {
			return Err(Error::RecipientNotFound(id.into()));
		}

		Self::checked(response, "requesting card")?
			.json()
			.await
			.map_err(|source| Error::Service {
				what: format!("reading card {id}"),
				source,
			})
	}

	#[instrument(level = "debug", skip(self))]
	async fn search_cards(&self, criteria: &SearchCriteria) -> Result<Vec<Card>, Error> {
		let url = format!("{}/v4/card/actions/search", self.base_url);
		let response = self
			.client
			.post(&url)
			.json(criteria)
			.send()
			.await
			.map_err(|source| Error::Service {
				what: "searching cards".into(),
				source,
			})?;

		let cards: Vec<Card> = Self::checked(response, "searching cards")?
			.json()
			.await
			.map_err(|source| Error::Service {
				what: "reading search results".into(),
				source,
			})?;
		debug!(found = cards.len(), "searched cards");
		Ok(cards)
	}
}
