//! Common test utilities and helpers
//!
//! Shared fixtures for the integration tests: configuration files, local
//! clones whose origin cannot be reached, and a fake SBOM generator script.

#![allow(dead_code)]

pub mod test_helpers;
