//! Development media server for the Muso web player.
//!
//! Serves local media (tracks, lyrics, cover art) from a sandboxed data
//! directory with HTTP byte-range support, accepts streamed uploads into
//! that directory, and falls back to the embedded SPA shell for everything
//! else so the player's history-mode routes work under deep links.

pub mod config;
pub mod error;
pub mod frontend;
pub mod http;
pub mod logging;
pub mod media;
pub mod media_type;
pub mod range;
pub mod router;
pub mod storage;
pub mod version;
