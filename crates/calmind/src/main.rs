//! Talk to the companion from a terminal.
//!
//! Reads `OPENROUTER_KEY` (and the optional `CALMIND_*` variables) from the
//! environment or a `.env` file.
//!
//! # Examples
//!
//! ```sh
//! # One-shot
//! calmind --message "I feel really anxious about tomorrow"
//!
//! # Pipe a message in
//! echo "Work has been overwhelming lately" | calmind --stdin
//!
//! # Interactive (blank line or Ctrl-D to quit)
//! calmind --flow emotion-first
//! ```

use std::io::{self, BufRead, Read, Write};
use std::process;

use calmind::prelude::*;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

const APOLOGY: &str = "Sorry, something went wrong while preparing a response. Please try again.";

/// Log filter when `RUST_LOG` is unset; same as the web shell.
const DEFAULT_LOG_FILTER: &str = "info";

/// Talk to the calmind companion from a terminal.
#[derive(Parser)]
#[command(name = "calmind")]
struct Cli {
    /// Message to answer (one-shot mode)
    #[arg(long, short)]
    message: Option<String>,

    /// Read the message from stdin (one-shot mode)
    #[arg(long, conflicts_with = "message")]
    stdin: bool,

    /// Model to use instead of CALMIND_MODEL
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature instead of CALMIND_TEMPERATURE (0.0 – 2.0)
    #[arg(long)]
    temperature: Option<f32>,

    /// Stage dispatch: fan-out, sequential, or emotion-first
    #[arg(long)]
    flow: Option<Flow>,
}

fn load_config(cli: &Cli) -> Result<CompanionConfig, ConfigError> {
    let mut config = CompanionConfig::from_env()?;
    if let Some(ref model) = cli.model {
        config = config.with_model(model);
    }
    if let Some(temperature) = cli.temperature {
        config = config.with_temperature(temperature)?;
    }
    if let Some(flow) = cli.flow {
        config = config.with_flow(flow);
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let companion = match load_config(&cli).and_then(|c| Companion::from_config(&c)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let one_shot = if cli.stdin {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("Error: failed to read stdin: {e}");
            process::exit(1);
        }
        Some(buf)
    } else {
        cli.message.clone()
    };

    if let Some(message) = one_shot {
        match companion.handle(&message).await {
            Ok(reply) => println!("{}", reply.text()),
            Err(e) => {
                error!("{e}");
                eprintln!("{APOLOGY}");
                process::exit(1);
            }
        }
        return;
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("How are you feeling today?\n> ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error: failed to read input: {e}");
                process::exit(1);
            }
            None => break,
        };
        if line.trim().is_empty() {
            break;
        }

        match companion.handle(&line).await {
            Ok(reply) => println!("\n{}\n", reply.text()),
            Err(e) => {
                error!("{e}");
                eprintln!("{APOLOGY}\n");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_is_interactive() {
        let cli = Cli::try_parse_from(["calmind"]).unwrap();
        assert!(cli.message.is_none());
        assert!(!cli.stdin);
        assert!(cli.flow.is_none());
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn flow_flag_parses() {
        let cli = Cli::try_parse_from(["calmind", "-m", "rough day", "--flow", "emotion-first"])
            .unwrap();
        assert_eq!(cli.message.as_deref(), Some("rough day"));
        assert_eq!(cli.flow, Some(Flow::EmotionFirst));
        assert!(Cli::try_parse_from(["calmind", "--flow", "sideways"]).is_err());
    }

    #[test]
    fn stdin_conflicts_with_message() {
        assert!(Cli::try_parse_from(["calmind", "--stdin", "-m", "hello there"]).is_err());
    }
}
