//! Application construction.

use std::collections::BTreeMap;
use std::sync::Arc;

use tessera_params::{MemStore, Subspace, SubspaceRegistry};

use crate::codec::AppCodec;
use crate::config::AppConfig;
use crate::error::AppError;

/// A wired application: one codec, one store pair, one parameter subspace
/// per configured module.
#[derive(Debug)]
pub struct SimApp {
	config: AppConfig,
	codec: AppCodec,
	store: Arc<MemStore>,
	transient: Arc<MemStore>,
	registry: SubspaceRegistry,
	subspaces: BTreeMap<String, Subspace>,
}

impl SimApp {
	/// Builds the application. A module listed twice aborts startup with
	/// [`AppError::Allocate`].
	pub fn new(config: AppConfig) -> Result<Self, AppError> {
		let codec = AppCodec::new(config.codec.clone())?;
		let store = Arc::new(MemStore::new());
		let transient = Arc::new(MemStore::new());
		let mut registry = SubspaceRegistry::new(Arc::clone(codec.hybrid()), store.clone(), transient.clone());

		let mut subspaces = BTreeMap::new();
		for module in &config.modules {
			let space = registry.allocate(module)?;
			subspaces.insert(module.clone(), space);
		}
		tracing::info!(modules = subspaces.len(), "application wired");

		Ok(Self {
			config,
			codec,
			store,
			transient,
			registry,
			subspaces,
		})
	}

	pub fn config(&self) -> &AppConfig {
		&self.config
	}

	pub fn codec(&self) -> &AppCodec {
		&self.codec
	}

	pub fn registry(&self) -> &SubspaceRegistry {
		&self.registry
	}

	/// The subspace owned by `module`.
	pub fn subspace(&self, module: &str) -> Option<&Subspace> {
		self.subspaces.get(module)
	}

	pub fn store(&self) -> &Arc<MemStore> {
		&self.store
	}

	/// Ends the block: parameter writes stop counting as modified.
	pub fn commit(&self) {
		self.transient.clear();
		tracing::debug!("transient parameter store cleared");
	}
}
