//! Common test utilities and fixtures for the noteblob-core test suite.
//!
//! Shared test data, known-answer vectors and a deterministic random source
//! used across the integration and property-based tests.

pub mod fixtures;
