//! Arihante is a minimal terminal assistant for small shop owners.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the interaction controller (view state machine, request
//!   orchestration, voice capture), the completion client, the speech
//!   adapter, and configuration.
//! - [`ui`] renders one screen per view state and runs the interactive event
//!   loop that turns key presses into controller actions.
//! - [`api`] defines the chat-completion payloads sent to the remote API.
//! - [`utils`] holds URL, input sanitization, and logging helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves settings and dispatches into
//! [`ui::chat_loop`] or one of the TUI-less commands.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
