//! Internal modules for the event hub terminal client.
//!
//! This library provides command parsing, form prompts, configuration,
//! logging and the two front ends used by the eh_client binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod prompts;
pub mod traced_api;
pub mod tui_app;
