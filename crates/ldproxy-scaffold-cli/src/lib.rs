//! ldproxy-scaffold command-line front end.

pub mod commands;
pub mod config;
