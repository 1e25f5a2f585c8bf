pub mod factory;
pub mod source;
pub mod store;
