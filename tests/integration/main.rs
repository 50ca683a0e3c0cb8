//! Integration tests for the oplogger binary

mod helpers;

mod cli_test;
mod parse_test;
mod session_test;
