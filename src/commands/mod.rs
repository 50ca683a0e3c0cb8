//! Command handlers for the oplogger binary

pub mod config;
pub mod parse;
pub mod start;
pub mod status;
pub mod stop;
