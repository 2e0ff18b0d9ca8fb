pub mod catalog;
pub mod cli;
pub mod config;
pub mod drive;
pub mod error;
pub mod export;
pub mod logging;
pub mod prompt;
pub mod scanner;
pub mod store;
pub mod thumbnails;
