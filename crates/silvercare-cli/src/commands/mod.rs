pub mod alerts;
pub mod chat;
pub mod config;
pub mod history;
pub mod quick;
pub mod serve;
pub mod utils;
pub mod vitals;
