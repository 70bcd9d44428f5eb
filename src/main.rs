//! `etcd-draft` command line client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use etcd_draft::config::{load_config, ClientConfig};
use etcd_draft::observability::logging::init_logging;
use etcd_draft::{ClientError, EtcdClient, VerificationStrategy};

#[derive(Parser)]
#[command(name = "etcd-draft")]
#[command(about = "Verify etcd endpoints and issue v2 API requests", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Candidate endpoint (repeatable); replaces configured endpoints
    #[arg(short, long = "endpoint")]
    endpoints: Vec<String>,

    /// Verification strategy: all, any or quorum
    #[arg(short, long)]
    strategy: Option<VerificationStrategy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify endpoints and print the resulting pool
    Verify,
    /// Print server and cluster version
    Version,
    /// Read a key
    Get {
        key: String,
        #[arg(short, long)]
        recursive: bool,
    },
    /// Write a key
    Set {
        key: String,
        value: String,
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Delete a key, or a directory with --recursive
    Rm {
        key: String,
        #[arg(short, long)]
        recursive: bool,
    },
    /// List cluster members
    Members,
}

#[derive(Serialize)]
struct PoolMember<'a> {
    endpoint: &'a str,
    server_version: Option<&'a str>,
    cluster_version: Option<&'a str>,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if !cli.endpoints.is_empty() {
        config.endpoints = cli.endpoints.clone();
    }
    if config.endpoints.is_empty() {
        config.endpoints.push("http://127.0.0.1:2379".to_string());
    }
    if let Some(strategy) = cli.strategy {
        config.verification.strategy = strategy;
    }

    init_logging(&config.observability);

    let client = match EtcdClient::connect(config).await {
        Ok(client) => client,
        Err(ClientError::Verification(err)) => {
            eprintln!("Error: {err}");
            for failure in err.failures() {
                eprintln!("  [{}] {}: {}", failure.index, failure.candidate, failure.error);
            }
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    match cli.command {
        Commands::Verify => {
            let members: Vec<PoolMember<'_>> = client
                .pool()
                .iter()
                .map(|e| PoolMember {
                    endpoint: e.as_str(),
                    server_version: e.version().map(|v| v.server.as_str()),
                    cluster_version: e.version().map(|v| v.cluster.as_str()),
                })
                .collect();
            print_json(&members)?;
        }
        Commands::Version => print_json(&client.version().await?)?,
        Commands::Get { key, recursive } => {
            let response = if recursive {
                client.get_recursive(&key, true).await?
            } else {
                client.get(&key).await?
            };
            print_json(&response)?;
        }
        Commands::Set { key, value, ttl } => print_json(&client.set(&key, &value, ttl).await?)?,
        Commands::Rm { key, recursive } => {
            let response = if recursive {
                client.delete_dir(&key, true).await?
            } else {
                client.delete(&key).await?
            };
            print_json(&response)?;
        }
        Commands::Members => print_json(&client.list_members().await?)?,
    }

    Ok(())
}
