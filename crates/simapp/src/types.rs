//! Account and supply capability interfaces with their reference implementations.

use std::any::Any;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// A denominated amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
	pub denom: String,
	pub amount: u64,
}

impl Coin {
	pub fn new(denom: impl Into<String>, amount: u64) -> Self {
		Self {
			denom: denom.into(),
			amount,
		}
	}
}

/// Anything the auth module can store as an account.
///
/// The concrete type travels with the encoded value, so keepers only ever see
/// `Box<dyn Account>`.
#[typetag::serde]
pub trait Account: Any + Debug + Send + Sync {
	fn address(&self) -> &str;
	fn account_number(&self) -> u64;
	fn sequence(&self) -> u64;
	fn set_sequence(&mut self, sequence: u64);
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseAccount {
	pub address: String,
	pub account_number: u64,
	pub sequence: u64,
}

impl BaseAccount {
	pub fn new(address: impl Into<String>, account_number: u64) -> Self {
		Self {
			address: address.into(),
			account_number,
			sequence: 0,
		}
	}
}

#[typetag::serde(name = "cosmos-sdk/BaseAccount")]
impl Account for BaseAccount {
	fn address(&self) -> &str {
		&self.address
	}

	fn account_number(&self) -> u64 {
		self.account_number
	}

	fn sequence(&self) -> u64 {
		self.sequence
	}

	fn set_sequence(&mut self, sequence: u64) {
		self.sequence = sequence;
	}
}

/// Account owned by a module rather than a key holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAccount {
	pub base: BaseAccount,
	pub name: String,
	pub permissions: Vec<String>,
}

impl ModuleAccount {
	pub fn new(base: BaseAccount, name: impl Into<String>, permissions: &[&str]) -> Self {
		Self {
			base,
			name: name.into(),
			permissions: permissions.iter().map(|p| (*p).to_owned()).collect(),
		}
	}

	pub fn has_permission(&self, permission: &str) -> bool {
		self.permissions.iter().any(|p| p == permission)
	}
}

#[typetag::serde(name = "cosmos-sdk/ModuleAccount")]
impl Account for ModuleAccount {
	fn address(&self) -> &str {
		&self.base.address
	}

	fn account_number(&self) -> u64 {
		self.base.account_number
	}

	fn sequence(&self) -> u64 {
		self.base.sequence
	}

	fn set_sequence(&mut self, sequence: u64) {
		self.base.sequence = sequence;
	}
}

/// Total token supply as seen by the bank module.
#[typetag::serde]
pub trait SupplyI: Any + Debug + Send + Sync {
	fn total(&self) -> &[Coin];

	/// Adds `coins` to the total, merging by denomination.
	fn inflate(&mut self, coins: &[Coin]);

	fn amount_of(&self, denom: &str) -> u64 {
		self.total()
			.iter()
			.filter(|c| c.denom == denom)
			.fold(0u64, |acc, c| acc.saturating_add(c.amount))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Supply {
	pub total: Vec<Coin>,
}

impl Supply {
	pub fn new(total: Vec<Coin>) -> Self {
		Self { total }
	}
}

#[typetag::serde(name = "cosmos-sdk/Supply")]
impl SupplyI for Supply {
	fn total(&self) -> &[Coin] {
		&self.total
	}

	fn inflate(&mut self, coins: &[Coin]) {
		for coin in coins {
			match self.total.iter_mut().find(|c| c.denom == coin.denom) {
				Some(existing) => existing.amount = existing.amount.saturating_add(coin.amount),
				None => self.total.push(coin.clone()),
			}
		}
		self.total.sort_by(|a, b| a.denom.cmp(&b.denom));
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn inflate_merges_by_denom() {
		let mut supply = Supply::new(vec![Coin::new("stake", 10)]);
		supply.inflate(&[Coin::new("atom", 3), Coin::new("stake", 5)]);
		assert_eq!(supply.total, vec![Coin::new("atom", 3), Coin::new("stake", 15)]);
		assert_eq!(supply.amount_of("stake"), 15);
		assert_eq!(supply.amount_of("missing"), 0);
	}

	#[test]
	fn amount_of_saturates_on_duplicate_denoms() {
		let supply = Supply::new(vec![Coin::new("stake", u64::MAX), Coin::new("stake", 2)]);
		assert_eq!(supply.amount_of("stake"), u64::MAX);
	}

	#[test]
	fn module_account_delegates_to_base() {
		let mut acc = ModuleAccount::new(BaseAccount::new("mod1", 4), "fee_collector", &["burner"]);
		acc.set_sequence(9);
		assert_eq!(acc.base.sequence, 9);
		assert_eq!(acc.address(), "mod1");
		assert!(acc.has_permission("burner"));
		assert!(!acc.has_permission("minter"));
	}
}
