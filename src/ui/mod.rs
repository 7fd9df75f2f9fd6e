//! Terminal interface.
//!
//! - [`chat_loop`]: the interactive loop that maps terminal input onto
//!   controller actions and runs the commands they produce.
//! - [`renderer`]: one ratatui screen per view state.
//!
//! This layer only presents and captures; every state change goes through
//! [`crate::core::app::apply_action`].

pub mod chat_loop;
pub mod renderer;
