#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod installer;
pub mod logging;
pub mod project;
pub mod registry;
pub mod resolver;
pub mod search;
pub mod utils;
