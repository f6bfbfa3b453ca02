pub mod engine;
pub mod route;
