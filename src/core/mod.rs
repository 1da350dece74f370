//! core
//!
//! Core domain types and configuration for resetit.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Provider, RepositoryTarget, CommitMessage, BranchName
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Configuration is validated once, when it is loaded

pub mod config;
pub mod types;
