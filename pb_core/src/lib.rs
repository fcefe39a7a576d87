#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod config;
pub mod discord;
pub mod format;
pub mod host;
pub mod purge;
pub mod settings;
pub mod structs;

pub use structs::Error;
