use std::any::Any;
use std::fmt::Debug;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::{Deserialize, Serialize};

use super::*;
use crate::error::ErrorKind;

trait Param: Any + Debug + Send + Sync {
	fn weight(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct S {
	i: i64,
}

impl Param for S {
	fn weight(&self) -> i64 {
		self.i
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Invalid;

#[derive(Debug, Serialize, Deserialize)]
struct Unregistered {
	name: String,
}

fn test_codec() -> LegacyCodec {
	let mut builder = LegacyCodecBuilder::new();
	builder
		.register_concrete::<S>("test/s")
		.unwrap()
		.implements::<dyn Param>(|v| v)
		.unwrap();
	builder.register_concrete::<Invalid>("test/invalid").unwrap();
	builder.build()
}

#[test]
fn encoded_bytes_begin_with_tag() {
	let cdc = test_codec();
	let bz = cdc.encode(&S { i: 10 }).unwrap();
	assert_eq!(bz[0] as usize, "test/s".len());
	assert_eq!(&bz[1..7], b"test/s");
}

#[test]
fn roundtrip_through_interface() {
	let cdc = test_codec();
	let original = S { i: -42 };
	let bz = cdc.encode(&original).unwrap();

	let decoded: Box<dyn Param> = cdc.decode(&bz).unwrap();
	assert_eq!(decoded.weight(), -42);
	let any: &dyn Any = &*decoded;
	assert_eq!(any.downcast_ref::<S>(), Some(&original));
}

#[test]
fn roundtrip_unit_type_without_interface() {
	let cdc = test_codec();
	let bz = cdc.encode(&Invalid).unwrap();
	let decoded = cdc.decode_any(&bz).unwrap();
	assert!(decoded.downcast_ref::<Invalid>().is_some());
}

#[test]
fn unregistered_type_is_rejected() {
	let cdc = test_codec();
	let value = Unregistered { name: "x".into() };
	let err = cdc.encode(&value).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::UnregisteredType);
	assert!(matches!(err, CodecError::UnregisteredType { type_id } if type_id == TypeId::of::<Unregistered>()));
	assert!(cdc.encode_json(&value).unwrap_err().is_unregistered());
}

#[test]
fn boxed_trait_object_must_be_dereferenced() {
	let cdc = test_codec();
	let boxed: Box<dyn Param> = Box::new(S { i: 1 });
	assert!(cdc.encode(&boxed).unwrap_err().is_unregistered());
	assert!(cdc.encode(&*boxed).is_ok());
}

#[test]
fn unknown_tag_is_rejected() {
	let mut bz = postcard::to_allocvec("test/unknown").unwrap();
	bz.extend_from_slice(&[1, 2, 3]);
	let err = test_codec().decode_any(&bz).unwrap_err();
	assert_eq!(
		err,
		CodecError::UnregisteredTag {
			tag: "test/unknown".into()
		}
	);
}

#[test]
fn interface_not_implemented() {
	let cdc = test_codec();
	let bz = cdc.encode(&Invalid).unwrap();
	let err = cdc.decode::<dyn Param>(&bz).unwrap_err();
	assert!(matches!(err, CodecError::NotImplemented { tag: "test/invalid", .. }));
	assert!(err.is_unregistered());
}

#[rstest]
#[case::empty(0)]
#[case::inside_tag(3)]
#[case::after_tag(7)]
fn truncated_input_is_decode_error(#[case] keep: usize) {
	let cdc = test_codec();
	let bz = cdc.encode(&S { i: i64::MAX }).unwrap();
	let err = cdc.decode::<dyn Param>(&bz[..keep]).unwrap_err();
	assert!(err.is_decode(), "{err}");
}

#[test]
fn trailing_bytes_are_decode_error() {
	let cdc = test_codec();
	let mut bz = cdc.encode(&S { i: 3 }).unwrap();
	bz.push(0);
	assert!(cdc.decode_any(&bz).unwrap_err().is_decode());
}

#[test]
fn json_layout_and_roundtrip() {
	let cdc = test_codec();
	let bz = cdc.encode_json(&S { i: 5 }).unwrap();
	assert_eq!(std::str::from_utf8(&bz).unwrap(), r#"{"type":"test/s","value":{"i":5}}"#);

	let decoded: Box<dyn Param> = cdc.decode_json(&bz).unwrap();
	assert_eq!(decoded.weight(), 5);

	let unit = cdc.encode_json(&Invalid).unwrap();
	assert!(cdc.decode_json_any(&unit).unwrap().downcast_ref::<Invalid>().is_some());
}

#[test]
fn json_unknown_tag_and_garbage() {
	let cdc = test_codec();
	let err = cdc.decode_json_any(br#"{"type":"nope","value":{}}"#).unwrap_err();
	assert!(err.is_unregistered());
	assert!(cdc.decode_json_any(b"{").unwrap_err().is_decode());
}

#[test]
fn duplicate_tag_is_rejected() {
	let mut builder = LegacyCodecBuilder::new();
	builder.register_concrete::<S>("test/s").unwrap();
	let err = builder.register_concrete::<Invalid>("test/s").err().unwrap();
	assert!(matches!(err, RegisterError::DuplicateTag { tag: "test/s", .. }));
	assert_eq!(builder.len(), 1);
}

#[test]
fn duplicate_type_is_rejected() {
	let mut builder = LegacyCodecBuilder::new();
	builder.register_concrete::<S>("test/s").unwrap();
	let err = builder.register_concrete::<S>("test/s2").err().unwrap();
	assert_eq!(
		err,
		RegisterError::DuplicateType {
			type_name: type_name::<S>(),
			existing_tag: "test/s",
			tag: "test/s2",
		}
	);
}

#[test]
fn empty_tag_is_rejected() {
	let mut builder = LegacyCodecBuilder::new();
	let err = builder.register_concrete::<S>("").err().unwrap();
	assert!(matches!(err, RegisterError::EmptyTag { .. }));
	assert!(builder.is_empty());
}

#[test]
fn duplicate_interface_is_rejected() {
	let mut builder = LegacyCodecBuilder::new();
	let err = builder
		.register_concrete::<S>("test/s")
		.unwrap()
		.implements::<dyn Param>(|v| v)
		.unwrap()
		.implements::<dyn Param>(|v| v)
		.err()
		.unwrap();
	assert!(matches!(err, RegisterError::DuplicateInterface { tag: "test/s", .. }));
}

#[test]
fn lookups() {
	let cdc = test_codec();
	assert_eq!(cdc.tags(), vec!["test/invalid", "test/s"]);
	assert_eq!(cdc.tag_of::<S>(), Some("test/s"));
	assert_eq!(cdc.tag_of::<Unregistered>(), None);
	let reg = cdc.registration("test/s").unwrap();
	assert!(reg.implements_interface::<dyn Param>());
	assert_eq!(reg.interfaces().count(), 1);
}
