//! Isolated parameter store handle for one namespace.

use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tessera_codec::HybridCodec;

use crate::error::{ParamsError, Result};
use crate::key_table::{KeyTable, ParamAttr};
use crate::store::KvStore;

struct SubspaceInner {
	name: String,
	prefix: Vec<u8>,
	codec: Arc<HybridCodec>,
	store: Arc<dyn KvStore>,
	transient: Arc<dyn KvStore>,
	table: OnceLock<KeyTable>,
}

/// Parameter store scoped to `"<name>/"` in both the persistent and the
/// transient store.
///
/// Values are JSON-encoded through the shared [`HybridCodec`]. Writes are
/// checked against the subspace's [`KeyTable`] and recorded in the transient
/// store so [`Subspace::modified`] can report them until it is cleared.
#[derive(Clone)]
pub struct Subspace {
	inner: Arc<SubspaceInner>,
}

impl Subspace {
	pub(crate) fn new(
		name: &str,
		codec: Arc<HybridCodec>,
		store: Arc<dyn KvStore>,
		transient: Arc<dyn KvStore>,
	) -> Self {
		let mut prefix = name.as_bytes().to_vec();
		prefix.push(b'/');
		Self {
			inner: Arc::new(SubspaceInner {
				name: name.to_owned(),
				prefix,
				codec,
				store,
				transient,
				table: OnceLock::new(),
			}),
		}
	}

	pub fn name(&self) -> &str {
		&self.inner.name
	}

	/// True if both handles refer to the same allocation.
	pub fn same_space(&self, other: &Subspace) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// Installs the key table. Can only be done once per subspace.
	pub fn with_key_table(&self, table: KeyTable) -> Result<&Self> {
		self.inner
			.table
			.set(table)
			.map_err(|_| ParamsError::KeyTableAlreadySet {
				space: self.inner.name.clone(),
			})?;
		Ok(self)
	}

	pub fn has_key_table(&self) -> bool {
		self.inner.table.get().is_some()
	}

	fn key(&self, key: &str) -> Vec<u8> {
		let mut full = Vec::with_capacity(self.inner.prefix.len() + key.len());
		full.extend_from_slice(&self.inner.prefix);
		full.extend_from_slice(key.as_bytes());
		full
	}

	fn attr(&self, key: &str) -> Result<&ParamAttr> {
		self.inner
			.table
			.get()
			.and_then(|table| table.get(key))
			.ok_or_else(|| ParamsError::UnregisteredKey {
				space: self.inner.name.clone(),
				key: key.to_owned(),
			})
	}

	pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
		self.get_if_exists(key)?.ok_or_else(|| ParamsError::NotFound {
			space: self.inner.name.clone(),
			key: key.to_owned(),
		})
	}

	pub fn get_if_exists<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
		match self.get_raw(key) {
			Some(bz) => Ok(Some(self.inner.codec.unmarshal_json(&bz)?)),
			None => Ok(None),
		}
	}

	/// Stored JSON bytes, undecoded.
	pub fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
		self.inner.store.get(&self.key(key))
	}

	pub fn has(&self, key: &str) -> bool {
		self.inner.store.has(&self.key(key))
	}

	/// Whether `key` was written since the transient store was last cleared.
	pub fn modified(&self, key: &str) -> bool {
		self.inner.transient.has(&self.key(key))
	}

	/// Validates and stores `value` under `key`.
	pub fn set<T: Serialize + 'static>(&self, key: &str, value: &T) -> Result<()> {
		let attr = self.attr(key)?;
		if attr.type_id != TypeId::of::<T>() {
			return Err(ParamsError::TypeMismatch {
				key: key.to_owned(),
				expected: attr.type_name,
				got: type_name::<T>(),
			});
		}
		(attr.validate)(value).map_err(|reason| ParamsError::InvalidValue {
			key: key.to_owned(),
			reason,
		})?;
		let bz = self.inner.codec.marshal_json(value)?;
		self.write(key, &bz);
		Ok(())
	}

	/// Replaces the value under `key` with the JSON in `raw`, decoded as the
	/// key's registered type and validated before it is stored.
	pub fn update(&self, key: &str, raw: &[u8]) -> Result<()> {
		let attr = self.attr(key)?;
		let codec = &self.inner.codec;
		let value = (attr.decode)(codec, raw)?;
		(attr.validate)(&*value).map_err(|reason| ParamsError::InvalidValue {
			key: key.to_owned(),
			reason,
		})?;
		let bz = (attr.encode)(codec, &*value)?;
		self.write(key, &bz);
		Ok(())
	}

	fn write(&self, key: &str, bz: &[u8]) {
		let full = self.key(key);
		self.inner.store.set(&full, bz);
		self.inner.transient.set(&full, &[]);
		tracing::trace!(subspace = %self.inner.name, key, "parameter written");
	}

	/// All `(key, raw value)` pairs stored in this subspace, sorted by key.
	pub fn iterate_raw(&self) -> Vec<(String, Vec<u8>)> {
		let prefix_len = self.inner.prefix.len();
		self.inner
			.store
			.iter_prefix(&self.inner.prefix)
			.into_iter()
			// Keys are alphanumeric; a further separator belongs to a nested namespace.
			.filter(|(k, _)| !k[prefix_len..].contains(&b'/'))
			.map(|(k, v)| (String::from_utf8_lossy(&k[prefix_len..]).into_owned(), v))
			.collect()
	}
}

impl fmt::Debug for Subspace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subspace")
			.field("name", &self.inner.name)
			.field("table", &self.inner.table.get())
			.finish_non_exhaustive()
	}
}
