//! Errors raised while building the application.

use tessera_codec::RegisterError;
use tessera_params::AllocateError;
use thiserror::Error;

/// Startup failures. None of these are recoverable; the process should exit.
#[derive(Debug, Error)]
pub enum AppError {
	#[error("legacy registration failed: {0}")]
	Register(#[from] RegisterError),

	#[error("subspace allocation failed: {0}")]
	Allocate(#[from] AllocateError),

	#[error("invalid configuration: {0}")]
	Config(#[from] toml::de::Error),
}
