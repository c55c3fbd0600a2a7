//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for collaborators this service does not own, such as the
//! key-value store holding template overrides.

pub mod storage;
