//! Test Module
//!
//! Cross-module suites for the persona core.
//!
//! ## Test Categories
//! - `brain_tests`: end-to-end reply selection over trained model states
//! - `database_tests`: corpus table CRUD and JSON import
//! - `artifact_tests`: model artifact persistence and versioning
//! - `service_tests`: service lifecycle, learning and session bookkeeping
