//! Self-describing encoder: postcard for binary, serde_json for text.
//!
//! Values reach this layer already wrapped in an [`Envelope`]. Polymorphic
//! payloads (`Box<dyn Trait>` for a `typetag` trait) carry their concrete type
//! name inside the serialized form, so no per-type registration is needed here.
//!
//! The length-prefixed binary layout is `varint(len) ‖ body`, where `body` is
//! the bare postcard encoding of the envelope.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::envelope::Envelope;
use crate::error::{CodecError, Result, WireFormat};

pub(crate) fn encode_bare<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>> {
	postcard::to_allocvec(&Envelope::wrap(value)).map_err(|e| CodecError::encode(WireFormat::Binary, e))
}

pub(crate) fn decode_bare<V: DeserializeOwned>(bz: &[u8]) -> Result<V> {
	let (envelope, rest): (Envelope<V>, _) =
		postcard::take_from_bytes(bz).map_err(|e| CodecError::decode(WireFormat::Binary, e))?;
	if !rest.is_empty() {
		return Err(CodecError::decode(
			WireFormat::Binary,
			format_args!("{} trailing bytes after envelope", rest.len()),
		));
	}
	unwrap_envelope(envelope, WireFormat::Binary)
}

pub(crate) fn encode_length_prefixed<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>> {
	let body = encode_bare(value)?;
	// A byte sequence serializes as varint length followed by the raw bytes.
	postcard::to_allocvec(&body).map_err(|e| CodecError::encode(WireFormat::Binary, e))
}

pub(crate) fn decode_length_prefixed<V: DeserializeOwned>(bz: &[u8]) -> Result<V> {
	let (body, rest): (Vec<u8>, _) = postcard::take_from_bytes(bz)
		.map_err(|e| CodecError::decode(WireFormat::Binary, format_args!("length prefix: {e}")))?;
	if !rest.is_empty() {
		return Err(CodecError::decode(
			WireFormat::Binary,
			format_args!("length prefix covers {} bytes, {} bytes follow it", body.len(), rest.len()),
		));
	}
	decode_bare(&body)
}

pub(crate) fn encode_json<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>> {
	serde_json::to_vec(&Envelope::wrap(value)).map_err(|e| CodecError::encode(WireFormat::Json, e))
}

/// Decodes a JSON envelope.
///
/// A populated envelope is the bare value, so the body is decoded as `V`
/// directly. `null` is the empty envelope only when `V` rejects it; unit
/// structs, `()` and `None` all encode as `null` and must round-trip.
pub(crate) fn decode_json<V: DeserializeOwned>(bz: &[u8]) -> Result<V> {
	match serde_json::from_slice::<V>(bz) {
		Ok(value) => Ok(value),
		Err(_) if serde_json::from_slice::<()>(bz).is_ok() => Err(empty_envelope(WireFormat::Json)),
		Err(e) => Err(CodecError::decode(WireFormat::Json, e)),
	}
}

fn unwrap_envelope<V>(envelope: Envelope<V>, format: WireFormat) -> Result<V> {
	envelope.into_inner().ok_or_else(|| empty_envelope(format))
}

fn empty_envelope(format: WireFormat) -> CodecError {
	CodecError::decode(format, "empty envelope")
}
