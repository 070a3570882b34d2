//! Command-line front end: encrypt or decrypt a single file.

use aescrypt_stream::{decrypt_file, encrypt_file, Options, Password};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Mode {
    /// Encrypt a file
    E,
    /// Decrypt a file
    D,
}

#[derive(Parser, Debug)]
#[command(version, about = "Encrypt or decrypt AES Crypt container files")]
struct Cli {
    /// Operation: (e)ncrypt or (d)ecrypt
    mode: Mode,
    /// Password for the container
    password: String,
    /// Path to read from
    input: PathBuf,
    /// Path to write to
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let password = Password::new(cli.password);

    match cli.mode {
        Mode::E => encrypt_file(&password, &cli.input, &cli.output, &Options::default())
            .with_context(|| format!("failed to encrypt {}", cli.input.display()))?,
        Mode::D => decrypt_file(&password, &cli.input, &cli.output)
            .with_context(|| format!("failed to decrypt {}", cli.input.display()))?,
    }
    Ok(())
}
