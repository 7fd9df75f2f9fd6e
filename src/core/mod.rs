pub mod app;
pub mod chat_stream;
pub mod completion;
pub mod config;
pub mod speech;
