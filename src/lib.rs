pub mod cmd;
pub mod config;
pub mod encode;
pub mod error;
pub mod fixture;
pub mod key;
pub mod message;
