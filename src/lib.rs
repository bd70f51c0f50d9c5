pub mod archive;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod image;
