pub mod config;
pub mod helpers;
pub mod install;
pub mod list;
pub mod search;
