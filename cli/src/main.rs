mod crack;
mod generate;
mod visualize;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use chainbow_commons::{
    HashType, DEFAULT_CHAIN_COUNT, DEFAULT_CHAIN_LENGTH, DEFAULT_CHARSET,
    DEFAULT_MAX_PASSWORD_LENGTH,
};
use chainbow_engine::{TableConfig, TableConfigBuilder};

use crack::crack;
use generate::generate;
use visualize::visualize;

/// All the hash types supported.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum HashTypeArg {
    Ntlm,
    Md4,
    Md5,
    Sha1,
    Sha2_224,
    Sha2_256,
    Sha2_384,
    Sha2_512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl From<HashTypeArg> for HashType {
    fn from(arg: HashTypeArg) -> Self {
        match arg {
            HashTypeArg::Ntlm => HashType::Ntlm,
            HashTypeArg::Md4 => HashType::Md4,
            HashTypeArg::Md5 => HashType::Md5,
            HashTypeArg::Sha1 => HashType::Sha1,
            HashTypeArg::Sha2_224 => HashType::Sha2_224,
            HashTypeArg::Sha2_256 => HashType::Sha2_256,
            HashTypeArg::Sha2_384 => HashType::Sha2_384,
            HashTypeArg::Sha2_512 => HashType::Sha2_512,
            HashTypeArg::Sha3_224 => HashType::Sha3_224,
            HashTypeArg::Sha3_256 => HashType::Sha3_256,
            HashTypeArg::Sha3_384 => HashType::Sha3_384,
            HashTypeArg::Sha3_512 => HashType::Sha3_512,
        }
    }
}

/// Educational rainbow table sandbox: generate tables, crack digests and
/// visualize hash chains.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Generate(Generate),
    Crack(Crack),
    Visualize(Visualize),
}

/// The table parameters shared by every subcommand.
#[derive(Args)]
pub struct TableArgs {
    /// The type of the hash.
    #[arg(short = 'H', long, value_enum, default_value = "md5")]
    hash_type: HashTypeArg,

    /// The charset to use.
    #[arg(short, long, value_parser = check_charset, default_value_t = String::from_utf8_lossy(DEFAULT_CHARSET).to_string())]
    charset: String,

    /// The maximum password length in the keyspace.
    #[arg(short = 'l', long, value_parser = value_parser!(u8).range(1..=10), default_value_t = DEFAULT_MAX_PASSWORD_LENGTH)]
    max_length: u8,

    /// The chain length.
    /// Longer chains store less but crack slower.
    #[arg(short = 't', long, value_parser = value_parser!(u64).range(1..=1_000_000), default_value_t = DEFAULT_CHAIN_LENGTH as u64)]
    chain_length: u64,

    /// The number of chains to generate.
    #[arg(short = 'm', long, value_parser = value_parser!(u64).range(1..), default_value_t = DEFAULT_CHAIN_COUNT as u64)]
    chain_count: u64,

    /// The seed of the start password draw.
    /// The same seed always rebuilds the same table.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

impl TableArgs {
    /// Builds a validated table configuration from the arguments.
    pub fn config(&self) -> Result<TableConfig> {
        let config = TableConfigBuilder::new()
            .hash_type(self.hash_type.into())
            .charset(self.charset.as_bytes())
            .max_length(self.max_length as usize)
            .chain_length(self.chain_length as usize)
            .chain_count(self.chain_count as usize)
            .seed(self.seed)
            .build()
            .context("invalid table parameters")?;

        Ok(config)
    }
}

/// Generate a rainbow table and report its coverage.
#[derive(Args)]
pub struct Generate {
    #[command(flatten)]
    table: TableArgs,
}

/// Find the password producing a certain hash digest.
#[derive(Args)]
pub struct Crack {
    /// The digest to crack, in hexadecimal.
    #[arg(value_parser = check_hex)]
    digest: String,

    #[command(flatten)]
    table: TableArgs,
}

/// Show every hash and reduction step of a single chain.
#[derive(Args)]
pub struct Visualize {
    /// The password the chain starts from.
    start_password: String,

    #[command(flatten)]
    table: TableArgs,
}

/// Checks if the charset is made of ASCII characters.
fn check_charset(charset: &str) -> Result<String> {
    if !charset.is_ascii() {
        bail!("The charset can only contain ASCII characters");
    }

    Ok(charset.to_owned())
}

/// Checks if the digest is valid hexadecimal.
fn check_hex(hex: &str) -> Result<String> {
    hex::decode(hex).context("The digest is not valid hexadecimal")?;
    Ok(hex.to_owned())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.commands {
        Commands::Generate(gen) => generate(gen)?,
        Commands::Crack(args) => crack(args)?,
        Commands::Visualize(vis) => visualize(vis)?,
    }

    Ok(())
}
