// Library root
// -----------
// This crate exposes the Gist client and the command handlers as a
// library. The binary (`main.rs`) wires them to a terminal host.
//
// Module responsibilities:
// - `api`: HTTP interactions with the GitHub Gist REST API.
// - `auth`: bearer token sources (environment, stored token, prompt).
// - `commands`: the four user commands (open, create, update, delete)
//   expressed against the host traits.
// - `host`: capabilities the commands need from their surroundings
//   (prompts, editor views, clipboard and browser).
// - `ui`: terminal implementation of those capabilities.
//
// The commands never talk to the terminal directly, so they can be
// driven by a scripted host in tests or by a different front end.
pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod language;
pub mod model;
pub mod session;
pub mod ui;

pub use error::{GistError, Result};
