pub mod app;
pub mod bootstrap;
pub mod client;
pub mod components;
pub mod config;
pub mod todo;
