//! Entry points routing polymorphic values to the modern or legacy encoder.
//!
//! The binary and JSON entry points always use the self-describing encoder;
//! they never fall back to the legacy layout. Legacy bytes are produced and
//! consumed only through the explicit `*_legacy*` methods.

use std::any::Any;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::CodecConfig;
use crate::error::{CodecError, Result, WireFormat};
use crate::legacy::{AnyValue, LegacyCodec};
use crate::modern;

/// Codec for values whose concrete type is only known through a capability
/// trait.
///
/// Polymorphic values are passed as `Box<dyn Trait>` (decode) or `&dyn Trait`
/// (encode) where `Trait` is a `typetag` trait; plain serde types work too.
#[derive(Debug, Clone)]
pub struct HybridCodec {
	legacy: Arc<LegacyCodec>,
	config: CodecConfig,
}

impl HybridCodec {
	pub fn new(legacy: LegacyCodec) -> Self {
		Self::with_config(legacy, CodecConfig::default())
	}

	pub fn with_config(legacy: LegacyCodec, config: CodecConfig) -> Self {
		Self {
			legacy: Arc::new(legacy),
			config,
		}
	}

	pub fn legacy(&self) -> &LegacyCodec {
		&self.legacy
	}

	pub fn config(&self) -> &CodecConfig {
		&self.config
	}

	/// Rejects encoder output the decoding side would refuse.
	fn check_output(&self, bz: Vec<u8>, format: WireFormat) -> Result<Vec<u8>> {
		if bz.len() > self.config.max_message_bytes {
			tracing::debug!(%format, len = bz.len(), limit = self.config.max_message_bytes, "encoded message too large");
			return Err(CodecError::encode(
				format,
				format_args!(
					"output of {} bytes exceeds limit of {}",
					bz.len(),
					self.config.max_message_bytes
				),
			));
		}
		Ok(bz)
	}

	fn check_len(&self, bz: &[u8], format: WireFormat) -> Result<()> {
		if bz.len() > self.config.max_message_bytes {
			return Err(CodecError::decode(
				format,
				format_args!(
					"input of {} bytes exceeds limit of {}",
					bz.len(),
					self.config.max_message_bytes
				),
			));
		}
		Ok(())
	}

	/// Envelope-wraps `value` and encodes it with a varint length prefix.
	pub fn marshal_binary<V: Serialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>> {
		self.check_output(modern::encode_length_prefixed(value)?, WireFormat::Binary)
	}

	/// Decodes bytes produced by [`Self::marshal_binary`].
	pub fn unmarshal_binary<V: DeserializeOwned>(&self, bz: &[u8]) -> Result<V> {
		self.check_len(bz, WireFormat::Binary)?;
		modern::decode_length_prefixed(bz).inspect_err(|e| tracing::trace!(error = %e, "binary decode failed"))
	}

	pub fn marshal_binary_bare<V: Serialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>> {
		self.check_output(modern::encode_bare(value)?, WireFormat::Binary)
	}

	pub fn unmarshal_binary_bare<V: DeserializeOwned>(&self, bz: &[u8]) -> Result<V> {
		self.check_len(bz, WireFormat::Binary)?;
		modern::decode_bare(bz).inspect_err(|e| tracing::trace!(error = %e, "bare binary decode failed"))
	}

	pub fn marshal_json<V: Serialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>> {
		self.check_output(modern::encode_json(value)?, WireFormat::Json)
	}

	pub fn unmarshal_json<V: DeserializeOwned>(&self, bz: &[u8]) -> Result<V> {
		self.check_len(bz, WireFormat::Json)?;
		modern::decode_json(bz).inspect_err(|e| tracing::trace!(error = %e, "json decode failed"))
	}

	/// Encodes `value` in the legacy layout.
	///
	/// Pass the concrete value or a dereferenced trait object (`&*boxed`);
	/// a `&Box<dyn Trait>` refers to the box itself, which is never registered.
	pub fn marshal_legacy(&self, value: &dyn Any) -> Result<Vec<u8>> {
		self.check_output(self.legacy.encode(value)?, WireFormat::Legacy)
	}

	/// Decodes legacy bytes as the interface `I`.
	pub fn unmarshal_legacy<I: ?Sized + 'static>(&self, bz: &[u8]) -> Result<Box<I>> {
		self.check_len(bz, WireFormat::Legacy)?;
		self.legacy.decode(bz)
	}

	pub fn unmarshal_legacy_any(&self, bz: &[u8]) -> Result<AnyValue> {
		self.check_len(bz, WireFormat::Legacy)?;
		self.legacy.decode_any(bz)
	}

	pub fn marshal_legacy_json(&self, value: &dyn Any) -> Result<Vec<u8>> {
		self.check_output(self.legacy.encode_json(value)?, WireFormat::LegacyJson)
	}

	pub fn unmarshal_legacy_json<I: ?Sized + 'static>(&self, bz: &[u8]) -> Result<Box<I>> {
		self.check_len(bz, WireFormat::LegacyJson)?;
		self.legacy.decode_json(bz)
	}

	pub fn unmarshal_legacy_json_any(&self, bz: &[u8]) -> Result<AnyValue> {
		self.check_len(bz, WireFormat::LegacyJson)?;
		self.legacy.decode_json_any(bz)
	}
}

impl Default for HybridCodec {
	fn default() -> Self {
		Self::new(LegacyCodec::empty())
	}
}
