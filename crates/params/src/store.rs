//! Key-value store contract consumed by subspaces.

use std::collections::BTreeMap;

use parking_lot::RwLock;

/// Persistence engine behind a parameter subspace.
///
/// Implementations own their locking; every method takes `&self` so one
/// store can back many subspaces at once.
pub trait KvStore: Send + Sync {
	fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

	fn has(&self, key: &[u8]) -> bool {
		self.get(key).is_some()
	}

	fn set(&self, key: &[u8], value: &[u8]);

	fn delete(&self, key: &[u8]);

	/// All entries whose key starts with `prefix`, in ascending key order.
	fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;
}

/// In-memory ordered store.
#[derive(Debug, Default)]
pub struct MemStore {
	entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Removes every entry. Used to reset transient stores between blocks.
	pub fn clear(&self) {
		self.entries.write().clear();
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

impl KvStore for MemStore {
	fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
		self.entries.read().get(key).cloned()
	}

	fn has(&self, key: &[u8]) -> bool {
		self.entries.read().contains_key(key)
	}

	fn set(&self, key: &[u8], value: &[u8]) {
		self.entries.write().insert(key.to_vec(), value.to_vec());
	}

	fn delete(&self, key: &[u8]) {
		self.entries.write().remove(key);
	}

	fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
		self.entries
			.read()
			.range(prefix.to_vec()..)
			.take_while(|(k, _)| k.starts_with(prefix))
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn iter_prefix_is_scoped_and_ordered() {
		let store = MemStore::new();
		store.set(b"bank/b", b"2");
		store.set(b"bank/a", b"1");
		store.set(b"bankx/a", b"x");
		store.set(b"auth/a", b"y");

		let got = store.iter_prefix(b"bank/");
		assert_eq!(
			got,
			vec![(b"bank/a".to_vec(), b"1".to_vec()), (b"bank/b".to_vec(), b"2".to_vec())]
		);
	}

	#[test]
	fn delete_and_clear() {
		let store = MemStore::new();
		store.set(b"k", b"v");
		assert!(store.has(b"k"));
		store.delete(b"k");
		assert!(!store.has(b"k"));

		store.set(b"a", b"1");
		store.set(b"b", b"2");
		store.clear();
		assert!(store.is_empty());
	}
}
