//! Allocation of uniquely named parameter subspaces.

use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;
use tessera_codec::HybridCodec;

use crate::error::AllocateError;
use crate::store::KvStore;
use crate::subspace::Subspace;

/// Module name used in log output.
pub const MODULE_NAME: &str = "x/params";

/// Hands out one [`Subspace`] per namespace for the lifetime of the process.
///
/// Allocation takes `&mut self` and happens while the application is being
/// wired; afterwards the registry is shared read-only and
/// [`lookup`](Self::lookup) may be called from any thread. Entries are never
/// removed: an allocated name stays resolvable whether or not its owner still
/// holds the handle. The registry never writes through the handles it keeps.
pub struct SubspaceRegistry {
	codec: Arc<HybridCodec>,
	store: Arc<dyn KvStore>,
	transient: Arc<dyn KvStore>,
	spaces: HashMap<String, Subspace>,
}

impl SubspaceRegistry {
	pub fn new(codec: Arc<HybridCodec>, store: Arc<dyn KvStore>, transient: Arc<dyn KvStore>) -> Self {
		Self {
			codec,
			store,
			transient,
			spaces: HashMap::default(),
		}
	}

	/// Allocates the subspace `name`.
	///
	/// Fails for the empty name and for a name that was already allocated.
	/// Callers should treat either error as fatal.
	pub fn allocate(&mut self, name: &str) -> Result<Subspace, AllocateError> {
		if name.is_empty() {
			tracing::warn!(module = MODULE_NAME, "rejected empty subspace name");
			return Err(AllocateError::EmptyNamespace);
		}
		if self.spaces.contains_key(name) {
			tracing::warn!(module = MODULE_NAME, subspace = name, "subspace already occupied");
			return Err(AllocateError::NamespaceCollision { name: name.to_owned() });
		}

		let space = Subspace::new(
			name,
			Arc::clone(&self.codec),
			Arc::clone(&self.store),
			Arc::clone(&self.transient),
		);
		self.spaces.insert(name.to_owned(), space.clone());
		tracing::debug!(module = MODULE_NAME, subspace = name, "allocated parameter subspace");
		Ok(space)
	}

	/// Returns the subspace allocated under `name`. Never allocates.
	pub fn lookup(&self, name: &str) -> Option<Subspace> {
		self.spaces.get(name).cloned()
	}

	pub fn is_allocated(&self, name: &str) -> bool {
		self.spaces.contains_key(name)
	}

	/// Allocated namespaces, sorted.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<_> = self.spaces.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	pub fn len(&self) -> usize {
		self.spaces.len()
	}

	pub fn is_empty(&self) -> bool {
		self.spaces.is_empty()
	}

	pub fn codec(&self) -> &Arc<HybridCodec> {
		&self.codec
	}
}

impl std::fmt::Debug for SubspaceRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SubspaceRegistry")
			.field("spaces", &self.names())
			.finish_non_exhaustive()
	}
}
