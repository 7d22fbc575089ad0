//! CLI command implementations

pub mod command;
pub mod init;
pub mod resolve;
