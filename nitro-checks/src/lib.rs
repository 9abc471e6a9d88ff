// Export modules for the runner binary and the integration tests
pub mod accounting;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod rpc;
pub mod sandbox;
pub mod scenarios;
pub mod signature;
