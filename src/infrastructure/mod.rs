pub mod audio;
pub mod chat;
pub mod config;
pub mod providers;
