//! Browser UI shell for the calmind companion.
//!
//! `calmind-web` serves a single chat page and a small REST API in front of
//! a shared [`Companion`]. The page posts the message and the chosen
//! ambient sound; the server answers with the composed reply and the audio
//! reference to autoplay.
//!
//! # Quick start
//!
//! ```ignore
//! use calmind::prelude::*;
//! use calmind_web::{WebConfig, spawn_web};
//! use std::sync::Arc;
//!
//! let config = CompanionConfig::from_env()?;
//! let companion = Arc::new(Companion::from_config(&config)?);
//! let addr = spawn_web(companion, WebConfig::default()).await?;
//! println!("Web UI: http://{addr}");
//! ```
//!
//! # Endpoints
//!
//! | Route | |
//! |-------|-|
//! | `POST /api/submit` | `{"message", "sound"}` → `{"reply", "audio", "mood", "clarification"}` |
//! | `GET /api/sounds` | Dropdown choices and their audio references |
//! | `GET /health` | Liveness |
//! | `GET /static/*`, `GET /*` | Files from [`WebConfig::static_dir`] |

mod api;
mod server;
pub mod sound;

pub use api::{GENERIC_FAILURE, SubmitRequest, SubmitResponse};
pub use server::build_router;
pub use sound::{AmbientSound, SoundChoice};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use calmind::companion::Companion;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `0.0.0.0:8080`.
    pub bind_addr: SocketAddr,
    /// Directory holding `index.html` and the audio files. Default: `static`.
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            static_dir: PathBuf::from("static"),
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down.
pub async fn spawn_web(companion: Arc<Companion>, config: WebConfig) -> std::io::Result<SocketAddr> {
    let router = server::build_router(companion, &config.static_dir);
    server::start_server(router, config.bind_addr).await
}
