//! Domain models for Gazette.
//!
//! # Core Concepts
//!
//! - [`Author`]: a registered user. Authors own the comments and notes they
//!   create; ownership never changes.
//! - [`NewsItem`]: a public news entry anyone can read. Listed newest-first.
//! - [`Comment`]: reader feedback on one news item, listed oldest-first.
//! - [`Note`]: a private note addressed by a unique slug, visible only to
//!   its author.
//! - [`Session`]: a bearer token standing in for a logged-in author.

mod author;
mod news;
mod note;
mod session;

pub use author::*;
pub use news::*;
pub use note::*;
pub use session::*;
