pub mod admin;
pub mod ajax;
pub mod public;
