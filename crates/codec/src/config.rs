//! Codec limits.

use serde::{Deserialize, Serialize};

/// Default upper bound on the size of an input accepted by any decode path.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
	/// Inputs longer than this are rejected before decoding.
	pub max_message_bytes: usize,
}

impl Default for CodecConfig {
	fn default() -> Self {
		Self {
			max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
		}
	}
}
