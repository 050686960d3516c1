use std::{io::ErrorKind, path::PathBuf};

use tokio::{
	fs::File,
	io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::debug;

use crate::error::Error;

/// Where command input comes from: a file, or stdin when no path was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDataSource {
	Stdin,
	File(PathBuf),
}

impl FileDataSource {
	pub fn new(path: Option<PathBuf>) -> Self {
		path.map_or(Self::Stdin, Self::File)
	}

	pub async fn read_all(&self) -> Result<Vec<u8>, Error> {
		let mut data = Vec::new();
		match self {
			Self::Stdin => {
				debug!("reading from stdin");
				tokio::io::stdin()
					.read_to_end(&mut data)
					.await
					.map_err(|err| Error::io("reading from stdin", err))?;
			}
			Self::File(path) => {
				debug!(?path, "reading from file");
				let mut file = File::open(path).await.map_err(|err| match err.kind() {
					ErrorKind::NotFound => Error::FileNotFound(path.clone()),
					_ => Error::io(format!("opening {}", path.display()), err),
				})?;
				file.read_to_end(&mut data)
					.await
					.map_err(|err| Error::io(format!("reading {}", path.display()), err))?;
			}
		}
		Ok(data)
	}

	pub async fn read_text(&self) -> Result<String, Error> {
		String::from_utf8(self.read_all().await?).map_err(|err| {
			Error::io(
				"reading text input",
				std::io::Error::new(ErrorKind::InvalidData, err),
			)
		})
	}
}

/// Where command output goes: a new file, or stdout when no path was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDataSink {
	Stdout,
	File(PathBuf),
}

impl FileDataSink {
	pub fn new(path: Option<PathBuf>) -> Self {
		path.map_or(Self::Stdout, Self::File)
	}

	/// Write all of `data`. Existing files are never overwritten.
	pub async fn write(&self, data: &[u8]) -> Result<(), Error> {
		match self {
			Self::Stdout => {
				let mut stdout = tokio::io::stdout();
				stdout
					.write_all(data)
					.await
					.map_err(|err| Error::io("writing to stdout", err))?;
				stdout
					.flush()
					.await
					.map_err(|err| Error::io("writing to stdout", err))?;
			}
			Self::File(path) => {
				debug!(?path, bytes = data.len(), "writing to file");
				let mut file = File::create_new(path)
					.await
					.map_err(|source| Error::CannotCreate {
						path: path.clone(),
						source,
					})?;
				file.write_all(data)
					.await
					.map_err(|err| Error::io(format!("writing {}", path.display()), err))?;
				file.flush()
					.await
					.map_err(|err| Error::io(format!("writing {}", path.display()), err))?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn file_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("data.bin");

		FileDataSink::new(Some(path.clone()))
			.write(b"hello")
			.await
			.unwrap();
		let data = FileDataSource::new(Some(path.clone()))
			.read_all()
			.await
			.unwrap();
		assert_eq!(data, b"hello");
	}

	#[tokio::test]
	async fn missing_input() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing");
		let err = FileDataSource::new(Some(path.clone()))
			.read_all()
			.await
			.unwrap_err();
		assert!(matches!(err, Error::FileNotFound(p) if p == path));
	}

	#[tokio::test]
	async fn never_overwrites() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("exists");
		std::fs::write(&path, "old").unwrap();

		let err = FileDataSink::new(Some(path.clone()))
			.write(b"new")
			.await
			.unwrap_err();
		assert!(matches!(err, Error::CannotCreate { .. }));
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
	}
}
