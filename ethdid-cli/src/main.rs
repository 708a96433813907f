//! ethdid CLI
//!
//! Runs the HTTP proxy and exposes its lookup and publish operations on the
//! command line.

use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ethdid_api::{ApiConfig, ApiServer};
use ethdid_core::types::{is_valid_did, EnsDomain, LookupResult, PublishResult};
use ethdid_resolver::AtprotoDidResolver;

/// ethdid - ENS to ATProto DID proxy
#[derive(Parser)]
#[command(name = "ethdid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Bind address
        #[arg(long, env = "ETHDID_HOST", default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(short, long, env = "ETHDID_PORT", default_value = "8000")]
        port: u16,
    },

    /// Look up the DID an ENS name serves
    Resolve {
        /// ENS name, e.g. alice.eth
        domain: String,
    },

    /// Publish a DID record for an ENS name
    Publish {
        /// ENS name, e.g. alice.eth
        domain: String,
        /// DID to publish, e.g. did:plc:abc123
        did: String,
    },

    /// Check whether a string is a syntactically valid DID
    Check {
        /// Candidate DID
        did: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env feeds clap's `env` fallbacks, so load it before parsing
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "ethdid=debug,info"
    } else {
        "ethdid=info,warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if cli.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    match cli.command {
        Commands::Serve { host, port } => cmd_serve(&host, port).await,
        Commands::Resolve { domain } => cmd_resolve(domain).await,
        Commands::Publish { domain, did } => cmd_publish(domain, &did).await,
        Commands::Check { did } => cmd_check(&did),
    }
}

fn build_resolver() -> Result<AtprotoDidResolver> {
    let config = ApiConfig::from_env();
    AtprotoDidResolver::with_config(config.resolver_config())
        .context("Failed to configure resolver")
}

/// Run API server
async fn cmd_serve(host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", host, port))?;

    let config = ApiConfig::from_env();
    tracing::debug!(?config, "Loaded configuration");
    let publishing = config.filebase_access_key.is_some() && config.filebase_secret_key.is_some();

    println!("{}", "Starting ethdid API server...".cyan().bold());
    println!("   {} http://{}", "Listening on:".green(), addr);
    println!("   {} http://{}/health", "Health check:".dimmed(), addr);
    if !publishing {
        println!(
            "   {} FILEBASE_ACCESS_KEY / FILEBASE_SECRET_KEY not set, POST will fail with pin_failure",
            "Publishing disabled:".yellow()
        );
    }
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(config).context("Failed to configure server")?;
    server.run(addr).await?;

    Ok(())
}

/// Resolve an ENS name
async fn cmd_resolve(domain: String) -> Result<()> {
    let domain = EnsDomain::parse(domain)?;
    let resolver = build_resolver()?;

    println!("{} {}", "Resolving".cyan().bold(), domain);

    match resolver.resolve(&domain).await {
        LookupResult::Found(did) => {
            println!("   {} {}", "DID:".green(), did);
            Ok(())
        }
        LookupResult::NotFound { reason, message } => {
            let error_type = ethdid_core::types::ErrorType::from(reason);
            println!("   {} {}", format!("{}:", error_type).red(), message);
            bail!("lookup failed: {}", error_type)
        }
    }
}

/// Publish a DID record
async fn cmd_publish(domain: String, did: &str) -> Result<()> {
    let domain = EnsDomain::parse(domain)?;
    let resolver = build_resolver()?;

    println!("{} {} -> {}", "Publishing".cyan().bold(), domain, did);

    match resolver.publish(&domain, did).await {
        PublishResult::Published { content_id } => {
            println!("   {} {}", "IPFS hash:".green(), content_id);
            println!("   {} {}", "Object:".dimmed(), domain.object_key());
            Ok(())
        }
        PublishResult::Rejected { reason, message } => {
            let error_type = ethdid_core::types::ErrorType::from(reason);
            println!("   {} {}", format!("{}:", error_type).red(), message);
            bail!("publish failed: {}", error_type)
        }
    }
}

/// Validate DID syntax
fn cmd_check(did: &str) -> Result<()> {
    if is_valid_did(did) {
        println!("{} {}", "valid".green().bold(), did);
        Ok(())
    } else {
        println!("{} {}", "invalid".red().bold(), did);
        bail!("not a valid DID: {}", did)
    }
}
