#![deny(missing_docs)]

//! Core library for the doculens client: upload/session state management for a
//! document extraction and question-answering backend.

/// Extraction backend wire contract and HTTP client.
pub mod backend;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Session activity metrics helpers.
pub mod metrics;
/// Ingestion and chat session managers.
pub mod session;
