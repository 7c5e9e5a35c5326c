// The binary in main.rs is a thin shell over this library; integration tests
// and the criterion benchmarks import the same module tree via `rackr::*`.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod session;
pub mod store;
pub mod ui;
