//! Declared parameter keys, their value types and validators.

use std::any::{Any, TypeId, type_name};
use std::fmt;

use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tessera_codec::{CodecError, HybridCodec, WireFormat};

use crate::error::{ParamsError, Result};

type ValidateFn = Box<dyn Fn(&dyn Any) -> std::result::Result<(), String> + Send + Sync>;
type DecodeFn = fn(&HybridCodec, &[u8]) -> tessera_codec::Result<Box<dyn Any>>;
type EncodeFn = fn(&HybridCodec, &dyn Any) -> tessera_codec::Result<Vec<u8>>;

pub(crate) struct ParamAttr {
	pub(crate) type_id: TypeId,
	pub(crate) type_name: &'static str,
	pub(crate) validate: ValidateFn,
	pub(crate) decode: DecodeFn,
	pub(crate) encode: EncodeFn,
}

/// Registered parameter keys of one subspace.
#[derive(Default)]
pub struct KeyTable {
	attrs: HashMap<&'static str, ParamAttr>,
}

impl KeyTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares `key` as holding values of type `T`, checked by `validator`
	/// before every write.
	pub fn register<T>(mut self, key: &'static str, validator: fn(&T) -> std::result::Result<(), String>) -> Result<Self>
	where
		T: Serialize + DeserializeOwned + 'static,
	{
		if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
			return Err(ParamsError::InvalidKey { key });
		}
		if self.attrs.contains_key(key) {
			return Err(ParamsError::DuplicateKey { key });
		}

		let validate: ValidateFn = Box::new(move |value| match value.downcast_ref::<T>() {
			Some(value) => validator(value),
			None => Err(format!("expected {}", type_name::<T>())),
		});
		self.attrs.insert(
			key,
			ParamAttr {
				type_id: TypeId::of::<T>(),
				type_name: type_name::<T>(),
				validate,
				decode: decode_json::<T>,
				encode: encode_json::<T>,
			},
		);
		Ok(self)
	}

	pub(crate) fn get(&self, key: &str) -> Option<&ParamAttr> {
		self.attrs.get(key)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.attrs.contains_key(key)
	}

	/// Registered keys, sorted.
	pub fn keys(&self) -> Vec<&'static str> {
		let mut keys: Vec<_> = self.attrs.keys().copied().collect();
		keys.sort_unstable();
		keys
	}

	pub fn len(&self) -> usize {
		self.attrs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.attrs.is_empty()
	}
}

impl fmt::Debug for KeyTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.keys().into_iter().filter_map(|k| self.attrs.get(k).map(|a| (k, a.type_name))))
			.finish()
	}
}

fn decode_json<T: DeserializeOwned + 'static>(codec: &HybridCodec, bz: &[u8]) -> tessera_codec::Result<Box<dyn Any>> {
	Ok(Box::new(codec.unmarshal_json::<T>(bz)?))
}

fn encode_json<T: Serialize + 'static>(codec: &HybridCodec, value: &dyn Any) -> tessera_codec::Result<Vec<u8>> {
	match value.downcast_ref::<T>() {
		Some(value) => codec.marshal_json(value),
		None => Err(CodecError::Encode {
			format: WireFormat::Json,
			reason: format!("expected {}", type_name::<T>()),
		}),
	}
}
