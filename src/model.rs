//! Domain objects produced from arguments.

pub use algorithm::KeyAlgorithm;
pub use card::{Card, CardScope};
pub use card_info::CardProperty;
pub use data::{FileDataSink, FileDataSource};
pub use key_value::KeyValue;
pub use keys::{Password, PrivateKey, PublicKey, SecretKey};
pub use recipient::Recipient;

mod algorithm;
mod card;
mod card_info;
mod data;
mod key_value;
mod keys;
mod recipient;
