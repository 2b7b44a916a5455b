//! Application configuration.

use serde::{Deserialize, Serialize};
use tessera_codec::CodecConfig;

use crate::error::AppError;

/// Modules wired by default, each with its own parameter subspace.
pub const DEFAULT_MODULES: &[&str] = &["auth", "bank", "staking", "slashing"];

/// Top-level configuration, usually read from TOML:
///
/// ```toml
/// modules = ["auth", "bank"]
///
/// [codec]
/// max_message_bytes = 65536
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
	pub codec: CodecConfig,
	pub modules: Vec<String>,
}

impl AppConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, AppError> {
		Ok(toml::from_str(input)?)
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			codec: CodecConfig::default(),
			modules: DEFAULT_MODULES.iter().map(|m| (*m).to_owned()).collect(),
		}
	}
}
