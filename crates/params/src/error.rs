//! Error types for subspace allocation and parameter access.

use tessera_codec::CodecError;
use thiserror::Error;

/// Startup wiring errors from [`SubspaceRegistry::allocate`].
///
/// Both variants indicate a programming error; application construction
/// should abort rather than continue with an ambiguous namespace map.
///
/// [`SubspaceRegistry::allocate`]: crate::SubspaceRegistry::allocate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
	#[error("cannot use empty string for subspace")]
	EmptyNamespace,

	#[error("subspace {name:?} already occupied")]
	NamespaceCollision { name: String },
}

/// Errors from reading or writing parameters through a subspace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
	#[error("parameter {key:?} not found in subspace {space:?}")]
	NotFound { space: String, key: String },

	#[error("parameter {key:?} not registered in the key table of subspace {space:?}")]
	UnregisteredKey { space: String, key: String },

	#[error("type mismatch for parameter {key:?}: expected {expected}, got {got}")]
	TypeMismatch {
		key: String,
		expected: &'static str,
		got: &'static str,
	},

	#[error("invalid value for parameter {key:?}: {reason}")]
	InvalidValue { key: String, reason: String },

	#[error("parameter key {key:?} registered twice")]
	DuplicateKey { key: &'static str },

	#[error("parameter key {key:?} must be non-empty and alphanumeric")]
	InvalidKey { key: &'static str },

	#[error("key table already set for subspace {space:?}")]
	KeyTableAlreadySet { space: String },

	#[error(transparent)]
	Codec(#[from] CodecError),
}

/// Result type for parameter operations.
pub type Result<T> = std::result::Result<T, ParamsError>;
