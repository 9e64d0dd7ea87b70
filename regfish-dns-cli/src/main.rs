//! `regfish-dns`: list, append, set and delete records of a regfish zone.
//!
//! Records are exchanged as JSON arrays of typed records:
//!
//! ```json
//! [{"name": "www", "ttl": 300, "data": {"type": "Address", "content": {"ip": "192.0.2.1"}}}]
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use regfish_dns_provider::{
    Record, RecordClient, RegfishClient, RegfishCredentials, RegfishProvider,
};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Parser)]
#[command(name = "regfish-dns", version, about)]
struct Cli {
    /// regfish API token
    #[arg(long, env = "REGFISH_API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// Override the API endpoint
    #[arg(long, env = "REGFISH_API_URL")]
    base_url: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every record of a zone
    List {
        /// Zone name, e.g. example.com
        zone: String,
    },
    /// Create records without checking for existing ones
    Append(BatchArgs),
    /// Create records or overwrite those with the same name and type
    Set(BatchArgs),
    /// Delete records matching name, type and data exactly
    Delete(BatchArgs),
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Zone name, e.g. example.com
    zone: String,

    /// JSON file with an array of records; reads stdin when omitted or "-"
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl BatchArgs {
    fn load(&self) -> Result<Vec<Record>> {
        match self.file.as_deref() {
            Some(path) if path != Path::new("-") => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                parse_records(BufReader::new(file))
                    .with_context(|| format!("Invalid records in {}", path.display()))
            }
            _ => parse_records(io::stdin().lock()).context("Invalid records on stdin"),
        }
    }
}

fn parse_records(reader: impl Read) -> Result<Vec<Record>> {
    Ok(serde_json::from_reader(reader)?)
}

fn build_provider(cli: &Cli) -> RegfishProvider {
    let credentials = RegfishCredentials::new(cli.api_token.clone());
    match cli.base_url.clone() {
        None => RegfishProvider::new(credentials),
        Some(base_url) => RegfishProvider::with_connector(credentials, move |credentials| {
            let client: Arc<dyn RecordClient> = Arc::new(
                RegfishClient::builder(credentials)
                    .base_url(base_url.clone())
                    .build()?,
            );
            Ok(client)
        }),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let provider = build_provider(&cli);
    let cancel = CancellationToken::new();

    let records = match &cli.command {
        Command::List { zone } => provider.list_records(zone, &cancel).await?,
        Command::Append(args) => {
            let records = args.load()?;
            provider
                .append_records(&args.zone, &records, &cancel)
                .await?
        }
        Command::Set(args) => {
            let records = args.load()?;
            provider.set_records(&args.zone, &records, &cancel).await?
        }
        Command::Delete(args) => {
            let records = args.load()?;
            provider
                .delete_records(&args.zone, &records, &cancel)
                .await?
        }
    };

    let output = if cli.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{output}");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regfish_dns_provider::RecordData;

    #[test]
    fn parses_set_with_file() {
        let cli = Cli::try_parse_from([
            "regfish-dns",
            "--api-token",
            "secret",
            "set",
            "example.com",
            "--file",
            "records.json",
        ])
        .unwrap();

        assert_eq!(cli.api_token, "secret");
        assert!(cli.base_url.is_none());
        match cli.command {
            Command::Set(args) => {
                assert_eq!(args.zone, "example.com");
                assert_eq!(args.file.as_deref(), Some(Path::new("records.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["regfish-dns", "--api-token", "secret"]).is_err());
    }

    #[test]
    fn parses_record_array() {
        let json = r#"[
            {"name": "www", "ttl": 300, "data": {"type": "Address", "content": {"ip": "192.0.2.1"}}},
            {"name": "@", "ttl": "3600", "data": {"type": "MX", "content": {"preference": 10, "target": "mail.example.com."}}}
        ]"#;

        let records = parse_records(json.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data.record_type(), "A");
        assert_eq!(records[1].ttl.as_secs(), 3600);
        assert!(matches!(records[1].data, RecordData::MX { preference: 10, .. }));
    }

    #[test]
    fn rejects_non_array_input() {
        assert!(parse_records(r#"{"name": "www"}"#.as_bytes()).is_err());
    }
}
