//! Parameter subspaces.
//!
//! A [`SubspaceRegistry`] hands out isolated, uniquely named [`Subspace`]
//! handles to independent subsystems. Each subspace prefixes its keys with its
//! name in a shared [`KvStore`], so no two subsystems can silently share or
//! collide on the same persisted parameters.

pub mod error;
pub mod key_table;
pub mod registry;
pub mod store;
pub mod subspace;

pub use error::{AllocateError, ParamsError, Result};
pub use key_table::KeyTable;
pub use registry::{MODULE_NAME, SubspaceRegistry};
pub use store::{KvStore, MemStore};
pub use subspace::Subspace;
