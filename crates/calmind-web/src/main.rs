//! Serve the calmind chat page.
//!
//! # Usage
//!
//! ```bash
//! OPENROUTER_KEY=sk-... cargo run -p calmind-web
//! OPENROUTER_KEY=sk-... cargo run -p calmind-web -- --port 3000 --bind 127.0.0.1
//! OPENROUTER_KEY=sk-... cargo run -p calmind-web -- --model anthropic/claude-haiku-4.5
//! ```
//!
//! Then open the printed URL, or post directly:
//!
//! ```json
//! POST /api/submit
//! {"message": "I feel really anxious about tomorrow", "sound": "Rain Sounds"}
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use calmind::prelude::*;
use calmind_web::{WebConfig, spawn_web};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Log filter when `RUST_LOG` is unset; same as the terminal shell.
const DEFAULT_LOG_FILTER: &str = "info";

/// Browser UI for the calmind companion.
#[derive(Parser)]
#[command(about = "Serve the calmind chat page")]
struct Args {
    /// Port for the web UI server.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Directory with index.html and the audio files.
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,

    /// Model to use instead of CALMIND_MODEL.
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature instead of CALMIND_TEMPERATURE (0.0 – 2.0).
    #[arg(long)]
    temperature: Option<f32>,
}

fn build_companion(args: &Args) -> Result<Companion, ConfigError> {
    let mut config = CompanionConfig::from_env()?;
    if let Some(ref model) = args.model {
        config = config.with_model(model);
    }
    if let Some(temperature) = args.temperature {
        config = config.with_temperature(temperature)?;
    }
    info!(
        "Model {} at temperature {} (flow: {})",
        config.model, config.temperature, config.flow
    );
    Companion::from_config(&config)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let args = Args::parse();

    // Configuration is frozen here and shared read-only by every request.
    let companion = match build_companion(&args) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let config = WebConfig {
        bind_addr: (args.bind, args.port).into(),
        static_dir: args.static_dir,
    };
    let addr = match spawn_web(companion, config).await {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Error: failed to start web server: {e}");
            process::exit(1);
        }
    };
    println!("Calmind: http://{addr}");

    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Error: failed to listen for shutdown signal: {e}");
    }
    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[test]
    fn flag_defaults_match_web_config() {
        let args = Args::try_parse_from(["calmind-web"]).unwrap();
        let defaults = WebConfig::default();
        assert_eq!(args.static_dir, defaults.static_dir);
        assert!(args.static_dir.is_relative());
        assert_eq!(SocketAddr::from((args.bind, args.port)), defaults.bind_addr);
    }
}
