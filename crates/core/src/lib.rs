//! Domain primitives shared by every madrasa console crate.
//!
//! - [`error::CoreError`]: domain-level error taxonomy.
//! - [`session::Session`]: the signed-in actor, passed explicitly to
//!   operations that attribute records to a user.
//! - [`status`]: enumerated status, type and role values.
//! - [`validation`]: client-side input checks run before any store call.

pub mod error;
pub mod session;
pub mod status;
pub mod types;
pub mod validation;
