//! Legacy tag-registered codec.
//!
//! Every concrete type must be registered under a stable string tag before it
//! can be encoded or decoded. The binary layout is
//! `varint(len(tag)) ‖ tag ‖ postcard(fields)`; the JSON layout is
//! `{"type": tag, "value": fields}`.
//!
//! Registrations are collected in a [`LegacyCodecBuilder`] during startup and
//! frozen into an immutable [`LegacyCodec`] before first use.

mod registration;

use std::any::{Any, TypeId, type_name};

use rustc_hash::FxHashMap as HashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use self::registration::{AnyValue, ConcreteRegistration, TypeRegistration};
use crate::error::{CodecError, RegisterError, Result, WireFormat};

/// Mutable registration table used during startup.
#[derive(Default)]
pub struct LegacyCodecBuilder {
	by_tag: HashMap<&'static str, TypeRegistration>,
	by_type: HashMap<TypeId, &'static str>,
}

impl LegacyCodecBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `T` under `tag`.
	///
	/// Fails if the tag is empty, already taken by another type, or if `T`
	/// already has a tag.
	pub fn register_concrete<T>(&mut self, tag: &'static str) -> std::result::Result<ConcreteRegistration<'_, T>, RegisterError>
	where
		T: Serialize + DeserializeOwned + Send + Sync + 'static,
	{
		let result = self.check_vacant::<T>(tag);
		if let Err(err) = &result {
			tracing::warn!(tag, type_name = type_name::<T>(), error = %err, "rejected legacy registration");
		}
		result?;

		tracing::debug!(tag, type_name = type_name::<T>(), "registered legacy type");
		self.by_type.insert(TypeId::of::<T>(), tag);
		let entry = self.by_tag.entry(tag).or_insert_with(|| TypeRegistration::new::<T>(tag));
		Ok(ConcreteRegistration::new(entry))
	}

	fn check_vacant<T: 'static>(&self, tag: &'static str) -> std::result::Result<(), RegisterError> {
		if tag.is_empty() {
			return Err(RegisterError::EmptyTag {
				type_name: type_name::<T>(),
			});
		}
		if let Some(&existing_tag) = self.by_type.get(&TypeId::of::<T>()) {
			return Err(RegisterError::DuplicateType {
				type_name: type_name::<T>(),
				existing_tag,
				tag,
			});
		}
		if let Some(existing) = self.by_tag.get(tag) {
			return Err(RegisterError::DuplicateTag {
				tag,
				existing: existing.type_name,
				new: type_name::<T>(),
			});
		}
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.by_tag.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_tag.is_empty()
	}

	/// Freezes the table.
	pub fn build(self) -> LegacyCodec {
		LegacyCodec {
			by_tag: self.by_tag,
			by_type: self.by_type,
		}
	}
}

/// Immutable legacy codec; safe to share across threads.
pub struct LegacyCodec {
	by_tag: HashMap<&'static str, TypeRegistration>,
	by_type: HashMap<TypeId, &'static str>,
}

#[derive(Serialize)]
struct TypedJsonRef<'a> {
	#[serde(rename = "type")]
	tag: &'a str,
	value: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TypedJson {
	#[serde(rename = "type")]
	tag: String,
	#[serde(default)]
	value: serde_json::Value,
}

impl LegacyCodec {
	/// A codec with no registrations.
	pub fn empty() -> Self {
		LegacyCodecBuilder::new().build()
	}

	pub fn registration(&self, tag: &str) -> Option<&TypeRegistration> {
		self.by_tag.get(tag)
	}

	pub fn registration_for(&self, type_id: TypeId) -> Option<&TypeRegistration> {
		self.by_type.get(&type_id).and_then(|tag| self.by_tag.get(tag))
	}

	pub fn tag_of<T: 'static>(&self) -> Option<&'static str> {
		self.by_type.get(&TypeId::of::<T>()).copied()
	}

	/// All registered tags, sorted.
	pub fn tags(&self) -> Vec<&'static str> {
		let mut tags: Vec<_> = self.by_tag.keys().copied().collect();
		tags.sort_unstable();
		tags
	}

	pub fn len(&self) -> usize {
		self.by_tag.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_tag.is_empty()
	}

	fn lookup_type(&self, value: &dyn Any) -> Result<&TypeRegistration> {
		let type_id = (*value).type_id();
		self.registration_for(type_id)
			.ok_or(CodecError::UnregisteredType { type_id })
	}

	fn lookup_tag(&self, tag: &str) -> Result<&TypeRegistration> {
		self.by_tag.get(tag).ok_or_else(|| CodecError::UnregisteredTag { tag: tag.to_owned() })
	}

	/// Encodes `value` as `tag ‖ fields`.
	pub fn encode(&self, value: &dyn Any) -> Result<Vec<u8>> {
		let reg = self.lookup_type(value)?;
		let prefix = postcard::to_allocvec(reg.tag).map_err(|e| CodecError::encode(WireFormat::Legacy, e))?;
		(reg.encode)(value, prefix)
	}

	/// Decodes a value without casting it to an interface.
	pub fn decode_any(&self, bz: &[u8]) -> Result<AnyValue> {
		let (reg, fields) = self.split_tag(bz)?;
		(reg.decode)(fields)
	}

	/// Decodes a value and casts it to the interface `I`.
	pub fn decode<I: ?Sized + 'static>(&self, bz: &[u8]) -> Result<Box<I>> {
		let (reg, fields) = self.split_tag(bz)?;
		if !reg.implements_interface::<I>() {
			return Err(CodecError::NotImplemented {
				tag: reg.tag,
				interface: type_name::<I>(),
			});
		}
		reg.cast((reg.decode)(fields)?)
	}

	fn split_tag<'a>(&self, bz: &'a [u8]) -> Result<(&TypeRegistration, &'a [u8])> {
		let (tag, fields): (&str, _) = postcard::take_from_bytes(bz)
			.map_err(|e| CodecError::decode(WireFormat::Legacy, format_args!("type tag: {e}")))?;
		let reg = self.lookup_tag(tag).inspect_err(|_| tracing::trace!(tag, "unknown legacy tag"))?;
		Ok((reg, fields))
	}

	/// Encodes `value` as `{"type": tag, "value": fields}`.
	pub fn encode_json(&self, value: &dyn Any) -> Result<Vec<u8>> {
		let reg = self.lookup_type(value)?;
		let typed = TypedJsonRef {
			tag: reg.tag,
			value: (reg.encode_json)(value)?,
		};
		serde_json::to_vec(&typed).map_err(|e| CodecError::encode(WireFormat::LegacyJson, e))
	}

	pub fn decode_json_any(&self, bz: &[u8]) -> Result<AnyValue> {
		let (reg, value) = self.split_json(bz)?;
		(reg.decode_json)(value)
	}

	pub fn decode_json<I: ?Sized + 'static>(&self, bz: &[u8]) -> Result<Box<I>> {
		let (reg, value) = self.split_json(bz)?;
		if !reg.implements_interface::<I>() {
			return Err(CodecError::NotImplemented {
				tag: reg.tag,
				interface: type_name::<I>(),
			});
		}
		reg.cast((reg.decode_json)(value)?)
	}

	fn split_json(&self, bz: &[u8]) -> Result<(&TypeRegistration, serde_json::Value)> {
		let typed: TypedJson =
			serde_json::from_slice(bz).map_err(|e| CodecError::decode(WireFormat::LegacyJson, e))?;
		let reg = self.lookup_tag(&typed.tag)?;
		Ok((reg, typed.value))
	}
}

impl std::fmt::Debug for LegacyCodec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LegacyCodec").field("tags", &self.tags()).finish()
	}
}

#[cfg(test)]
mod tests;
