//! Error types for encoding, decoding and legacy type registration.

use std::any::TypeId;
use std::fmt;

use thiserror::Error;

/// Wire format an operation targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireFormat {
	/// Self-describing postcard envelope, optionally length-prefixed.
	Binary,
	/// Self-describing JSON envelope.
	Json,
	/// Tag-prefixed legacy binary layout.
	Legacy,
	/// Legacy `{"type", "value"}` JSON layout.
	LegacyJson,
}

impl fmt::Display for WireFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Binary => "binary",
			Self::Json => "json",
			Self::Legacy => "legacy",
			Self::LegacyJson => "legacy json",
		})
	}
}

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// The in-memory value could not be represented.
	Encode,
	/// The bytes were malformed, truncated, or carried an empty envelope.
	Decode,
	/// The legacy path referenced a type or tag with no registration.
	UnregisteredType,
}

/// Errors returned by encode and decode entry points.
///
/// All failures are deterministic functions of the input; retrying with the
/// same value or bytes yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
	#[error("failed to encode {format} value: {reason}")]
	Encode { format: WireFormat, reason: String },

	#[error("failed to decode {format} bytes: {reason}")]
	Decode { format: WireFormat, reason: String },

	/// No registration exists for the concrete type being encoded.
	#[error("concrete type {type_id:?} is not registered with the legacy codec")]
	UnregisteredType { type_id: TypeId },

	/// No registration exists for the tag read from the input.
	#[error("legacy tag {tag:?} is not registered")]
	UnregisteredTag { tag: String },

	/// The tag is registered, but not as an implementation of the requested interface.
	#[error("legacy type {tag:?} is not registered as an implementation of {interface}")]
	NotImplemented { tag: &'static str, interface: &'static str },
}

impl CodecError {
	pub(crate) fn encode(format: WireFormat, reason: impl fmt::Display) -> Self {
		Self::Encode {
			format,
			reason: reason.to_string(),
		}
	}

	pub(crate) fn decode(format: WireFormat, reason: impl fmt::Display) -> Self {
		Self::Decode {
			format,
			reason: reason.to_string(),
		}
	}

	/// Returns the taxonomy bucket this error belongs to.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Encode { .. } => ErrorKind::Encode,
			Self::Decode { .. } => ErrorKind::Decode,
			Self::UnregisteredType { .. } | Self::UnregisteredTag { .. } | Self::NotImplemented { .. } => {
				ErrorKind::UnregisteredType
			}
		}
	}

	pub fn is_decode(&self) -> bool {
		self.kind() == ErrorKind::Decode
	}

	pub fn is_unregistered(&self) -> bool {
		self.kind() == ErrorKind::UnregisteredType
	}
}

/// Fatal registration errors, raised while the legacy codec is being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
	#[error("legacy tag must not be empty (type {type_name})")]
	EmptyTag { type_name: &'static str },

	/// Two concrete types claim the same tag.
	#[error("duplicate legacy tag {tag:?}: existing={existing} new={new}")]
	DuplicateTag {
		tag: &'static str,
		existing: &'static str,
		new: &'static str,
	},

	/// One concrete type registered under two tags.
	#[error("type {type_name} already registered as {existing_tag:?}, cannot register as {tag:?}")]
	DuplicateType {
		type_name: &'static str,
		existing_tag: &'static str,
		tag: &'static str,
	},

	#[error("{tag:?} already registered as an implementation of {interface}")]
	DuplicateInterface { tag: &'static str, interface: &'static str },
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
