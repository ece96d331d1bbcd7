pub mod analysis;
pub mod api;
pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod db;
pub mod global;
pub mod meeting;
pub mod transcription;
