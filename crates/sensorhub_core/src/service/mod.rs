//! Core use-case services.
//!
//! # Responsibility
//! - Validate input and orchestrate repository calls.
//! - Keep the CLI entry point decoupled from storage details.

pub mod device_service;
