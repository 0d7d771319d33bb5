//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::config::TallyConfig;

use super::open_db;

/// Read a comma-separated list from an environment variable
fn env_list(name: &str) -> Vec<String> {
    std::env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub async fn cmd_serve(
    db_path: &Path,
    config: TallyConfig,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Tally web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Plan: {}", config.tier);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let api_keys = env_list("TALLY_API_KEYS");

    // Local network access without auth
    let trusted_networks_str = std::env::var("TALLY_TRUSTED_NETWORKS").unwrap_or_default();
    let trusted_networks = tally_server::parse_trusted_networks(&trusted_networks_str);

    // Real client IP behind reverse proxies
    let trusted_proxies_str = std::env::var("TALLY_TRUSTED_PROXIES").unwrap_or_default();
    let trusted_proxies = tally_server::parse_trusted_networks(&trusted_proxies_str);

    let allowed_origins = env_list("TALLY_ALLOWED_ORIGINS");

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else {
        println!("   🔒 Authentication: Cloudflare Access header");
        if !api_keys.is_empty() {
            println!(
                "   🔑 API keys: {} configured (TALLY_API_KEYS)",
                api_keys.len()
            );
        }
        if !trusted_networks.is_empty() {
            println!(
                "   🏠 Trusted networks: {} (TALLY_TRUSTED_NETWORKS)",
                trusted_networks
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        if !trusted_proxies.is_empty() {
            println!(
                "   🔀 Trusted proxies: {} (TALLY_TRUSTED_PROXIES)",
                trusted_proxies
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let server_config = tally_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
        trusted_networks,
        trusted_proxies,
    };

    let static_dir_str = static_dir
        .map(|p| {
            p.to_str()
                .with_context(|| format!("Static dir is not valid UTF-8: {}", p.display()))
        })
        .transpose()?;

    tally_server::serve_with_config(db, host, port, static_dir_str, server_config, config).await?;

    Ok(())
}
