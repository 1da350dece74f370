//! forge
//!
//! Abstraction for the release APIs of remote forges (GitHub, GitLab).
//!
//! # Architecture
//!
//! The `Forge` trait defines the interface for listing and deleting the
//! releases of one repository. Callers use the [`create_forge`] factory
//! function rather than importing specific forge implementations directly.
//!
//! - Forge operations run only after the rewritten history has been pushed
//! - A forge never touches the local clone
//! - The access token lives inside the forge and never appears in errors
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait, `Release` and `ForgeError`
//! - [`github`]: GitHub implementation using the REST API
//! - [`gitlab`]: GitLab implementation using the v4 REST API
//! - [`mock`]: Mock implementation for deterministic testing
//! - `factory`: Forge selection and creation
//!
//! # Example
//!
//! ```ignore
//! use resetit::forge::{create_forge, Forge};
//!
//! let forge = create_forge(&target, Duration::from_secs(30))?;
//! for release in forge.list_releases().await? {
//!     println!("{}", release);
//! }
//! ```

mod factory;
pub mod github;
pub mod gitlab;
pub mod mock;
mod traits;

pub use factory::create_forge;
pub use traits::*;
