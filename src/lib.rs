pub mod auth;
pub mod config;
pub mod content;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod quiz;
pub mod services;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;
