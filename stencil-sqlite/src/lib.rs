mod bind;
mod config;
mod connection;
mod extract;

pub use config::*;
pub use connection::*;
