pub mod app;
pub mod complaints;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod notify;
pub mod outcome;
pub mod state;
pub mod users;
