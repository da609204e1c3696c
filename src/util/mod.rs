pub mod guard;
pub mod navigator;
pub mod token_store;
