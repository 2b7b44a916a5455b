//! Account and supply encoding through the application codec.

use std::any::Any;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tessera_codec::{CodecConfig, CodecError, ErrorKind};
use tessera_simapp::{
	Account, AccountCodec, AppCodec, BaseAccount, Coin, ModuleAccount, Supply, SupplyCodec, SupplyI,
	make_legacy_codec,
};

fn app_codec() -> AppCodec {
	AppCodec::new(CodecConfig::default()).unwrap()
}

fn as_base(account: &dyn Account) -> Option<&BaseAccount> {
	(account as &dyn Any).downcast_ref()
}

fn as_module(account: &dyn Account) -> Option<&ModuleAccount> {
	(account as &dyn Any).downcast_ref()
}

#[test]
fn account_binary_round_trip_keeps_concrete_type() {
	let cdc = app_codec();
	let module = ModuleAccount::new(BaseAccount::new("cosmos1fee", 7), "fee_collector", &["burner"]);

	let bz = cdc.marshal_account(&module).unwrap();
	let decoded = cdc.unmarshal_account(&bz).unwrap();
	assert_eq!(as_module(&*decoded), Some(&module));
	assert!(as_base(&*decoded).is_none());
	assert_eq!(decoded.account_number(), 7);
}

#[test]
fn account_json_names_concrete_type() {
	let cdc = app_codec();
	let acc = BaseAccount::new("cosmos1abc", 1);
	let json = cdc.marshal_account_json(&acc).unwrap();
	assert_eq!(
		String::from_utf8(json.clone()).unwrap(),
		r#"{"cosmos-sdk/BaseAccount":{"address":"cosmos1abc","account_number":1,"sequence":0}}"#
	);
	let decoded = cdc.unmarshal_account_json(&json).unwrap();
	assert_eq!(as_base(&*decoded), Some(&acc));
}

#[test]
fn supply_round_trips() {
	let cdc = app_codec();
	let supply = Supply::new(vec![Coin::new("stake", 1_000_000)]);

	let bz = cdc.marshal_supply(&supply).unwrap();
	let decoded = cdc.unmarshal_supply(&bz).unwrap();
	assert_eq!(decoded.total(), supply.total.as_slice());

	let json = cdc.marshal_supply_json(&supply).unwrap();
	let decoded = cdc.unmarshal_supply_json(&json).unwrap();
	assert_eq!(decoded.amount_of("stake"), 1_000_000);
}

#[test]
fn supply_bytes_are_not_an_account() {
	let cdc = app_codec();
	let bz = cdc.marshal_supply(&Supply::default()).unwrap();
	let err = cdc.unmarshal_account(&bz).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn legacy_registrations_cover_every_type() {
	let legacy = make_legacy_codec().unwrap();
	assert_eq!(
		legacy.tags(),
		vec!["cosmos-sdk/BaseAccount", "cosmos-sdk/ModuleAccount", "cosmos-sdk/Supply"]
	);
	assert_eq!(legacy.tag_of::<Supply>(), Some("cosmos-sdk/Supply"));
}

#[test]
fn legacy_account_round_trip() {
	let cdc = app_codec();
	let hybrid = cdc.hybrid();
	let acc = BaseAccount::new("cosmos1legacy", 3);

	let bz = hybrid.marshal_legacy(&acc).unwrap();
	assert_eq!(&bz[1..23], b"cosmos-sdk/BaseAccount");

	let decoded = hybrid.unmarshal_legacy::<dyn Account>(&bz).unwrap();
	assert_eq!(as_base(&*decoded), Some(&acc));

	// Legacy bytes are never accepted by the modern path.
	assert!(cdc.unmarshal_account(&bz).is_err());
}

#[test]
fn legacy_supply_is_not_an_account() {
	let cdc = app_codec();
	let bz = cdc.hybrid().marshal_legacy(&Supply::default()).unwrap();
	let err = cdc.hybrid().unmarshal_legacy::<dyn Account>(&bz).unwrap_err();
	assert!(matches!(err, CodecError::NotImplemented { tag: "cosmos-sdk/Supply", .. }));
	assert!(err.is_unregistered());
	assert!(cdc.hybrid().unmarshal_legacy::<dyn SupplyI>(&bz).is_ok());
}

#[test]
fn legacy_json_layout() {
	let cdc = app_codec();
	let supply = Supply::new(vec![Coin::new("atom", 2)]);
	let json = cdc.hybrid().marshal_legacy_json(&supply).unwrap();
	assert_eq!(
		String::from_utf8(json.clone()).unwrap(),
		r#"{"type":"cosmos-sdk/Supply","value":{"total":[{"amount":2,"denom":"atom"}]}}"#
	);
	let decoded = cdc.hybrid().unmarshal_legacy_json::<dyn SupplyI>(&json).unwrap();
	assert_eq!(decoded.total(), supply.total.as_slice());
}

#[test]
fn message_limit_applies_to_accounts() {
	let acc = BaseAccount::new("cosmos1toolong", 1);
	let strict = AppCodec::new(CodecConfig { max_message_bytes: 8 }).unwrap();
	assert_eq!(strict.marshal_account(&acc).unwrap_err().kind(), ErrorKind::Encode);
	assert_eq!(strict.marshal_account_json(&acc).unwrap_err().kind(), ErrorKind::Encode);

	let bz = app_codec().marshal_account(&acc).unwrap();
	assert_eq!(strict.unmarshal_account(&bz).unwrap_err().kind(), ErrorKind::Decode);
}

fn base_account() -> impl Strategy<Value = BaseAccount> {
	("[a-z0-9]{0,40}", any::<u64>(), any::<u64>()).prop_map(|(address, account_number, sequence)| BaseAccount {
		address,
		account_number,
		sequence,
	})
}

proptest! {
	#[test]
	fn accounts_round_trip_in_every_format(acc in base_account()) {
		let cdc = app_codec();

		let bz = cdc.marshal_account(&acc).unwrap();
		let decoded = cdc.unmarshal_account(&bz).unwrap();
		prop_assert_eq!(as_base(&*decoded), Some(&acc));

		let json = cdc.marshal_account_json(&acc).unwrap();
		let decoded = cdc.unmarshal_account_json(&json).unwrap();
		prop_assert_eq!(as_base(&*decoded), Some(&acc));

		let legacy = cdc.hybrid().marshal_legacy(&acc).unwrap();
		let decoded = cdc.hybrid().unmarshal_legacy::<dyn Account>(&legacy).unwrap();
		prop_assert_eq!(as_base(&*decoded), Some(&acc));
	}

	#[test]
	fn garbage_never_panics(bz in proptest::collection::vec(any::<u8>(), 0..64)) {
		let cdc = app_codec();
		let _ = cdc.unmarshal_account(&bz);
		let _ = cdc.unmarshal_supply_json(&bz);
		let _ = cdc.hybrid().unmarshal_legacy::<dyn Account>(&bz);
	}
}
