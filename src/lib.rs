pub mod audio;
pub mod compute;
pub mod config;
pub mod entities;
pub mod gesture;
pub mod landmark;
pub mod score_store;
pub mod session;
pub mod source;
