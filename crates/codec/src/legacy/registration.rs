//! Per-type registration entries for the legacy codec.

use std::any::{Any, TypeId, type_name};
use std::marker::PhantomData;

use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CodecError, RegisterError, Result, WireFormat};

/// Decoded legacy value, concrete type erased.
pub type AnyValue = Box<dyn Any + Send + Sync>;

type EncodeFn = fn(&dyn Any, Vec<u8>) -> Result<Vec<u8>>;
type DecodeFn = fn(&[u8]) -> Result<AnyValue>;
type EncodeJsonFn = fn(&dyn Any) -> Result<serde_json::Value>;
type DecodeJsonFn = fn(serde_json::Value) -> Result<AnyValue>;

/// Associates one concrete type with its stable legacy tag.
pub struct TypeRegistration {
	pub(crate) tag: &'static str,
	pub(crate) type_id: TypeId,
	pub(crate) type_name: &'static str,
	pub(crate) encode: EncodeFn,
	pub(crate) decode: DecodeFn,
	pub(crate) encode_json: EncodeJsonFn,
	pub(crate) decode_json: DecodeJsonFn,
	/// Interface casts keyed by the interface's `TypeId`. Each value is a
	/// `Box<dyn InterfaceCast<I>>` for that interface.
	interfaces: HashMap<TypeId, (&'static str, Box<dyn Any + Send + Sync>)>,
}

impl TypeRegistration {
	pub(crate) fn new<T>(tag: &'static str) -> Self
	where
		T: Serialize + DeserializeOwned + Send + Sync + 'static,
	{
		Self {
			tag,
			type_id: TypeId::of::<T>(),
			type_name: type_name::<T>(),
			encode: encode_fields::<T>,
			decode: decode_fields::<T>,
			encode_json: encode_json_fields::<T>,
			decode_json: decode_json_fields::<T>,
			interfaces: HashMap::default(),
		}
	}

	pub fn tag(&self) -> &'static str {
		self.tag
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Names of the interfaces this type may be decoded as.
	pub fn interfaces(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.interfaces.values().map(|(name, _)| *name)
	}

	pub fn implements_interface<I: ?Sized + 'static>(&self) -> bool {
		self.interfaces.contains_key(&TypeId::of::<I>())
	}

	pub(crate) fn cast<I: ?Sized + 'static>(&self, value: AnyValue) -> Result<Box<I>> {
		let not_implemented = || CodecError::NotImplemented {
			tag: self.tag,
			interface: type_name::<I>(),
		};
		let cast = self
			.interfaces
			.get(&TypeId::of::<I>())
			.and_then(|(_, cast)| cast.downcast_ref::<Box<dyn InterfaceCast<I>>>())
			.ok_or_else(not_implemented)?;
		cast.cast(value).ok_or_else(not_implemented)
	}
}

/// Handle returned by [`LegacyCodecBuilder::register_concrete`] for declaring
/// which interfaces the freshly registered type implements.
///
/// [`LegacyCodecBuilder::register_concrete`]: super::LegacyCodecBuilder::register_concrete
pub struct ConcreteRegistration<'a, T> {
	entry: &'a mut TypeRegistration,
	_marker: PhantomData<fn() -> T>,
}

impl<'a, T: Send + Sync + 'static> ConcreteRegistration<'a, T> {
	pub(crate) fn new(entry: &'a mut TypeRegistration) -> Self {
		Self {
			entry,
			_marker: PhantomData,
		}
	}

	/// Records that `T` may be decoded as the interface `I`.
	///
	/// `cast` is normally the identity closure `|v| v`, which coerces
	/// `Box<T>` into the trait object.
	pub fn implements<I: ?Sized + 'static>(self, cast: fn(Box<T>) -> Box<I>) -> std::result::Result<Self, RegisterError> {
		let key = TypeId::of::<I>();
		if self.entry.interfaces.contains_key(&key) {
			return Err(RegisterError::DuplicateInterface {
				tag: self.entry.tag,
				interface: type_name::<I>(),
			});
		}
		let erased: Box<dyn InterfaceCast<I>> = Box::new(TypedCast { cast });
		self.entry
			.interfaces
			.insert(key, (type_name::<I>(), Box::new(erased)));
		Ok(self)
	}

	pub fn tag(&self) -> &'static str {
		self.entry.tag
	}
}

trait InterfaceCast<I: ?Sized>: Send + Sync {
	fn cast(&self, value: AnyValue) -> Option<Box<I>>;
}

struct TypedCast<T, I: ?Sized> {
	cast: fn(Box<T>) -> Box<I>,
}

impl<T: Send + Sync + 'static, I: ?Sized + 'static> InterfaceCast<I> for TypedCast<T, I> {
	fn cast(&self, value: AnyValue) -> Option<Box<I>> {
		value.downcast::<T>().ok().map(self.cast)
	}
}

fn encode_fields<T: Serialize + 'static>(value: &dyn Any, out: Vec<u8>) -> Result<Vec<u8>> {
	let value = value
		.downcast_ref::<T>()
		.ok_or_else(|| CodecError::encode(WireFormat::Legacy, format_args!("value is not a {}", type_name::<T>())))?;
	postcard::to_extend(value, out).map_err(|e| CodecError::encode(WireFormat::Legacy, e))
}

fn decode_fields<T: DeserializeOwned + Send + Sync + 'static>(bz: &[u8]) -> Result<AnyValue> {
	let (value, rest): (T, _) =
		postcard::take_from_bytes(bz).map_err(|e| CodecError::decode(WireFormat::Legacy, e))?;
	if !rest.is_empty() {
		return Err(CodecError::decode(
			WireFormat::Legacy,
			format_args!("{} trailing bytes after {}", rest.len(), type_name::<T>()),
		));
	}
	Ok(Box::new(value))
}

fn encode_json_fields<T: Serialize + 'static>(value: &dyn Any) -> Result<serde_json::Value> {
	let value = value.downcast_ref::<T>().ok_or_else(|| {
		CodecError::encode(WireFormat::LegacyJson, format_args!("value is not a {}", type_name::<T>()))
	})?;
	serde_json::to_value(value).map_err(|e| CodecError::encode(WireFormat::LegacyJson, e))
}

fn decode_json_fields<T: DeserializeOwned + Send + Sync + 'static>(value: serde_json::Value) -> Result<AnyValue> {
	let value: T = serde_json::from_value(value).map_err(|e| CodecError::decode(WireFormat::LegacyJson, e))?;
	Ok(Box::new(value))
}
