//! Model loading functionality
//!
//! Reads descriptor documents into a type registry.

pub mod loader;

pub use loader::{LoaderError, RegistryDocument, RegistryLoader};
