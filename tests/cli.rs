use std::{
	fs,
	path::{Path, PathBuf},
	process::{Command, Output},
};

use tempfile::TempDir;

struct Workspace {
	dir: TempDir,
}

impl Workspace {
	fn new() -> Self {
		Self {
			dir: TempDir::with_prefix("virgil-").unwrap(),
		}
	}

	fn path(&self, name: &str) -> PathBuf {
		self.dir.path().join(name)
	}

	fn file(&self, name: &str, content: &[u8]) -> PathBuf {
		let path = self.path(name);
		fs::write(&path, content).unwrap();
		path
	}

	fn command(&self, args: &[&str]) -> Command {
		let home = self.path("home");
		fs::create_dir_all(&home).unwrap();

		let mut command = Command::new(env!("CARGO_BIN_EXE_virgil"));
		command
			.args(args)
			.env("HOME", &home)
			.env("XDG_CONFIG_HOME", home.join(".config"))
			.env("RUST_LOG", "warn")
			.env("NO_COLOR", "1")
			.env_remove("VIRGIL_CONFIG");
		command
	}

	fn run(&self, args: &[&str]) -> Output {
		self.command(args).output().unwrap()
	}

	/// Run with logging at the given verbosity instead of `RUST_LOG`.
	fn run_verbose(&self, args: &[&str]) -> Output {
		self.command(args).env_remove("RUST_LOG").output().unwrap()
	}

	fn ok(&self, args: &[&str]) -> Output {
		let output = self.run(args);
		assert!(
			output.status.success(),
			"virgil {args:?} failed: {}",
			String::from_utf8_lossy(&output.stderr)
		);
		output
	}
}

fn arg(path: &Path) -> &str {
	path.to_str().unwrap()
}

fn token(kind: &str, path: &Path) -> String {
	format!("{kind}:{}", path.display())
}

fn status(output: &Output) -> i32 {
	output.status.code().unwrap()
}

#[test]
fn keygen_encrypt_decrypt() {
	let ws = Workspace::new();
	let key = ws.path("alice.key");
	let public = ws.path("alice.pub");
	let plain = ws.file("plain.txt", b"attack at dawn");
	let encrypted = ws.path("plain.txt.age");
	let decrypted = ws.path("plain.out");

	ws.ok(&["keygen", "--no-password", "-o", arg(&key)]);
	ws.ok(&["key2pub", "-i", arg(&key), "-o", arg(&public)]);
	assert!(fs::read_to_string(&public).unwrap().starts_with("age1"));

	ws.ok(&[
		"encrypt",
		"-i",
		arg(&plain),
		"-o",
		arg(&encrypted),
		&token("pubkey", &public),
	]);
	assert_ne!(fs::read(&encrypted).unwrap(), b"attack at dawn");

	ws.ok(&[
		"decrypt",
		"-i",
		arg(&encrypted),
		"-o",
		arg(&decrypted),
		&token("privkey", &key),
	]);
	assert_eq!(fs::read(&decrypted).unwrap(), b"attack at dawn");
}

#[test]
fn protected_key_and_detached_content_info() {
	let ws = Workspace::new();
	let key = ws.path("bob.key");
	let public = ws.path("bob.pub");
	let plain = ws.file("plain.txt", b"meet at noon");
	let encrypted = ws.path("payload.bin");
	let info = ws.path("info.bin");

	ws.ok(&["keygen", "-p", "open sesame", "-o", arg(&key)]);
	assert!(fs::read(&key).unwrap().starts_with(b"age-encryption.org/v1"));

	let failed = ws.run(&["key2pub", "-i", arg(&key)]);
	assert_eq!(status(&failed), 64, "a protected key needs its password");

	ws.ok(&["key2pub", "-i", arg(&key), "-p", "open sesame", "-o", arg(&public)]);
	ws.ok(&[
		"encrypt",
		"-i",
		arg(&plain),
		"-o",
		arg(&encrypted),
		"--content-info",
		arg(&info),
		&token("pubkey", &public),
	]);
	assert!(fs::read(&info).unwrap().starts_with(b"age-encryption.org/v1"));

	let output = ws.ok(&[
		"decrypt",
		"-i",
		arg(&encrypted),
		"--content-info",
		arg(&info),
		"-p",
		"open sesame",
		&token("privkey", &key),
	]);
	assert_eq!(output.stdout, b"meet at noon");
}

#[test]
fn password_recipient() {
	let ws = Workspace::new();
	let plain = ws.file("plain.txt", b"hello");
	let encrypted = ws.path("plain.age");

	ws.ok(&["encrypt", "-i", arg(&plain), "-o", arg(&encrypted), "password:hunter2"]);

	let wrong = ws.run(&["decrypt", "-i", arg(&encrypted), "password:letmein"]);
	assert_eq!(status(&wrong), 65);

	let output = ws.ok(&["decrypt", "-i", arg(&encrypted), "password:hunter2"]);
	assert_eq!(output.stdout, b"hello");
}

#[test]
fn sign_and_verify() {
	let ws = Workspace::new();
	let key = ws.path("signer.key");
	let public = ws.path("signer.pub");
	let data = ws.file("data.txt", b"signed content");
	let tampered = ws.file("tampered.txt", b"signed content!");
	let signature = ws.path("data.sig");

	ws.ok(&["keygen", "-a", "ed25519", "--no-password", "-o", arg(&key)]);
	ws.ok(&["key2pub", "-i", arg(&key), "-o", arg(&public)]);
	assert!(
		fs::read_to_string(&public)
			.unwrap()
			.contains("BEGIN PUBLIC KEY")
	);

	ws.ok(&["sign", "-i", arg(&data), "-k", arg(&key), "-o", arg(&signature)]);
	ws.ok(&[
		"verify",
		"-i",
		arg(&data),
		"-s",
		arg(&signature),
		"-r",
		&token("pubkey", &public),
	]);

	let failed = ws.run(&[
		"verify",
		"-i",
		arg(&tampered),
		"-s",
		arg(&signature),
		"-r",
		&token("pubkey", &public),
	]);
	assert_eq!(status(&failed), 65);
}

#[test]
fn defaults_file() {
	let ws = Workspace::new();
	let key = ws.path("carol.key");
	let defaults = ws.file("defaults.yml", b"algorithm: ed25519\nno_password: true\n");

	ws.ok(&["--config", arg(&defaults), "keygen", "-o", arg(&key)]);
	assert!(
		fs::read_to_string(&key)
			.unwrap()
			.contains("BEGIN PRIVATE KEY")
	);

	let missing = ws.run(&["--config", arg(&ws.path("nope.yml")), "keygen"]);
	assert_eq!(status(&missing), 66);

	let broken = ws.file("broken.yml", b"algorithm: [unclosed");
	let failed = ws.run(&["--config", arg(&broken), "keygen"]);
	assert_eq!(status(&failed), 78);
}

#[test]
fn app_config() {
	let ws = Workspace::new();
	ws.ok(&["config", "--set", "token=AT.secret-token"]);

	let output = ws.ok(&["config"]);
	let shown = String::from_utf8(output.stdout).unwrap();
	assert!(shown.contains("AT.s****"));
	assert!(!shown.contains("secret-token"));

	let invalid = ws.run(&["config", "--set", "novalue"]);
	assert_eq!(status(&invalid), 64);
}

#[test]
fn usage_errors() {
	let ws = Workspace::new();

	let help = ws.run(&["--help"]);
	assert_eq!(status(&help), 0);
	assert!(String::from_utf8_lossy(&help.stdout).contains("Usage"));

	let help = ws.run(&["encrypt", "--help"]);
	assert_eq!(status(&help), 0);
	assert!(String::from_utf8_lossy(&help.stdout).contains("RECIPIENT"));

	assert_eq!(status(&ws.run(&[])), 64);
	assert_eq!(status(&ws.run(&["frobnicate"])), 64);
	assert_eq!(status(&ws.run(&["encrypt"])), 64);
	assert_eq!(status(&ws.run(&["encrypt", "carrier:pigeon"])), 64);
	assert_eq!(status(&ws.run(&["keygen", "--bogus"])), 64);
	assert_eq!(status(&ws.run(&["keygen", "-a", "rsa", "--no-password"])), 64);
}

#[test]
fn resource_errors() {
	let ws = Workspace::new();
	let key = ws.path("dave.key");
	ws.ok(&["keygen", "--no-password", "-o", arg(&key)]);

	let missing = ws.run(&[
		"decrypt",
		"-i",
		arg(&ws.path("missing.age")),
		&token("privkey", &key),
	]);
	assert_eq!(status(&missing), 66);

	let exists = ws.run(&["keygen", "--no-password", "-o", arg(&key)]);
	assert_eq!(status(&exists), 73);
}

#[test]
fn secrets_stay_out_of_logs() {
	let ws = Workspace::new();
	let key = ws.path("erin.key");
	let plain = ws.file("plain.txt", b"quiet please");
	let encrypted = ws.path("plain.age");

	let output = ws.run_verbose(&["-vvvv", "keygen", "-p", "Sekr1t-key-pass", "-o", arg(&key)]);
	assert!(output.status.success());
	let logs = String::from_utf8_lossy(&output.stderr);
	assert!(logs.contains("keygen"), "expected trace logs, got: {logs}");
	assert!(!logs.contains("Sekr1t-key-pass"));

	let output = ws.run_verbose(&[
		"-vvvv",
		"encrypt",
		"-i",
		arg(&plain),
		"-o",
		arg(&encrypted),
		"password:Sekr1t-data-pass",
	]);
	assert!(output.status.success());
	assert!(!String::from_utf8_lossy(&output.stderr).contains("Sekr1t-data-pass"));
	assert!(!String::from_utf8_lossy(&output.stdout).contains("Sekr1t-data-pass"));
}

#[test]
fn card_info() {
	let ws = Workspace::new();
	let cards = ws.file(
		"cards.json",
		br#"[
			{"id":"c1","identity":"alice@example.com","identity_type":"email","public_key":"age1alice","scope":"global"},
			{"id":"c2","identity":"bob@example.com","identity_type":"email","public_key":"age1bob"}
		]"#,
	);

	let output = ws.ok(&["card-info", "-i", arg(&cards), "-s", "identity"]);
	assert_eq!(output.stdout, b"alice@example.com\nbob@example.com\n");

	let output = ws.ok(&["card-info", "-i", arg(&cards), "-s", "scope", "-s", "id"]);
	assert_eq!(
		String::from_utf8(output.stdout).unwrap(),
		"id    : c1\nscope : global\nid    : c2\nscope : application\n"
	);

	assert_eq!(
		status(&ws.run(&["card-info", "-i", arg(&cards), "-s", "colour"])),
		64
	);
	assert_eq!(status(&ws.run(&["card-info", "-i", arg(&cards)])), 64);
}
