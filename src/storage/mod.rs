//! In-memory repository implementations.
//!
//! Persistent SQL storage sits behind the repository traits and is provided
//! by an embedding application; this store backs the services and tests with
//! the same contracts, including the atomic keyed upserts.

mod memory;

pub use memory::*;
