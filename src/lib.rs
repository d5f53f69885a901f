// Library exports for the CLI and testing
pub mod cli;
pub mod collection;
pub mod constants;
pub mod dom;
pub mod error;
pub mod page;
pub mod settings;
