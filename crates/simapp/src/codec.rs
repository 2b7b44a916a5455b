//! Application codec: the interfaces keepers encode accounts and supply through.

use std::sync::Arc;

use tessera_codec::{CodecConfig, HybridCodec, LegacyCodec, LegacyCodecBuilder, RegisterError, Result};

use crate::types::{Account, BaseAccount, ModuleAccount, Supply, SupplyI};

pub const BASE_ACCOUNT_TAG: &str = "cosmos-sdk/BaseAccount";
pub const MODULE_ACCOUNT_TAG: &str = "cosmos-sdk/ModuleAccount";
pub const SUPPLY_TAG: &str = "cosmos-sdk/Supply";

/// Encoding of accounts as the auth keeper needs it.
pub trait AccountCodec {
	fn marshal_account(&self, account: &dyn Account) -> Result<Vec<u8>>;
	fn unmarshal_account(&self, bz: &[u8]) -> Result<Box<dyn Account>>;
	fn marshal_account_json(&self, account: &dyn Account) -> Result<Vec<u8>>;
	fn unmarshal_account_json(&self, bz: &[u8]) -> Result<Box<dyn Account>>;
}

/// Encoding of the total supply as the bank keeper needs it.
pub trait SupplyCodec {
	fn marshal_supply(&self, supply: &dyn SupplyI) -> Result<Vec<u8>>;
	fn unmarshal_supply(&self, bz: &[u8]) -> Result<Box<dyn SupplyI>>;
	fn marshal_supply_json(&self, supply: &dyn SupplyI) -> Result<Vec<u8>>;
	fn unmarshal_supply_json(&self, bz: &[u8]) -> Result<Box<dyn SupplyI>>;
}

/// Registers every application type with the legacy encoder.
pub fn register_legacy(builder: &mut LegacyCodecBuilder) -> std::result::Result<(), RegisterError> {
	builder
		.register_concrete::<BaseAccount>(BASE_ACCOUNT_TAG)?
		.implements::<dyn Account>(|v| v)?;
	builder
		.register_concrete::<ModuleAccount>(MODULE_ACCOUNT_TAG)?
		.implements::<dyn Account>(|v| v)?;
	builder
		.register_concrete::<Supply>(SUPPLY_TAG)?
		.implements::<dyn SupplyI>(|v| v)?;
	Ok(())
}

pub fn make_legacy_codec() -> std::result::Result<LegacyCodec, RegisterError> {
	let mut builder = LegacyCodecBuilder::new();
	register_legacy(&mut builder)?;
	Ok(builder.build())
}

/// [`HybridCodec`] with the application's legacy registrations.
///
/// Binary account and supply encodings are length-prefixed modern envelopes;
/// the legacy layout is reachable through [`AppCodec::hybrid`] only.
#[derive(Debug, Clone)]
pub struct AppCodec {
	inner: Arc<HybridCodec>,
}

impl AppCodec {
	pub fn new(config: CodecConfig) -> std::result::Result<Self, RegisterError> {
		let legacy = make_legacy_codec()?;
		Ok(Self {
			inner: Arc::new(HybridCodec::with_config(legacy, config)),
		})
	}

	pub fn hybrid(&self) -> &Arc<HybridCodec> {
		&self.inner
	}
}

impl AccountCodec for AppCodec {
	fn marshal_account(&self, account: &dyn Account) -> Result<Vec<u8>> {
		self.inner.marshal_binary(account)
	}

	fn unmarshal_account(&self, bz: &[u8]) -> Result<Box<dyn Account>> {
		self.inner.unmarshal_binary(bz)
	}

	fn marshal_account_json(&self, account: &dyn Account) -> Result<Vec<u8>> {
		self.inner.marshal_json(account)
	}

	fn unmarshal_account_json(&self, bz: &[u8]) -> Result<Box<dyn Account>> {
		self.inner.unmarshal_json(bz)
	}
}

impl SupplyCodec for AppCodec {
	fn marshal_supply(&self, supply: &dyn SupplyI) -> Result<Vec<u8>> {
		self.inner.marshal_binary(supply)
	}

	fn unmarshal_supply(&self, bz: &[u8]) -> Result<Box<dyn SupplyI>> {
		self.inner.unmarshal_binary(bz)
	}

	fn marshal_supply_json(&self, supply: &dyn SupplyI) -> Result<Vec<u8>> {
		self.inner.marshal_json(supply)
	}

	fn unmarshal_supply_json(&self, bz: &[u8]) -> Result<Box<dyn SupplyI>> {
		self.inner.unmarshal_json(bz)
	}
}
