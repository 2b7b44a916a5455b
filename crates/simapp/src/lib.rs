//! Reference application wiring.
//!
//! Declares the [`Account`] and [`SupplyI`] capability interfaces with their
//! concrete implementations, the [`AppCodec`] keepers encode them through,
//! the legacy registrations of every application type, and [`SimApp`], which
//! allocates one parameter subspace per configured module.

pub mod app;
pub mod codec;
pub mod config;
pub mod error;
pub mod types;

pub use app::SimApp;
pub use codec::{AccountCodec, AppCodec, SupplyCodec, make_legacy_codec, register_legacy};
pub use config::{AppConfig, DEFAULT_MODULES};
pub use error::AppError;
pub use types::{Account, BaseAccount, Coin, ModuleAccount, Supply, SupplyI};

#[cfg(test)]
use proptest as _;
