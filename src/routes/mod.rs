pub mod api;
pub mod public;
pub mod session;
