pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod paths;
pub mod provider;
pub mod quiz;
pub mod state;
pub mod tracker;
