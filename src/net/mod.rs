pub mod api;
pub mod channel;
pub mod error;
pub mod transport;
pub mod types;
