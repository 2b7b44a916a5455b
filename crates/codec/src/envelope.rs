//! Single-slot carrier used to give the self-describing encoder a concrete
//! type to dispatch on.

use serde::{Deserialize, Serialize};

/// Holds at most one value.
///
/// Serializes transparently as `Option<V>`: for a polymorphic `V` such as
/// `Box<dyn Account>` the inner value carries its own type name, so the
/// decoder can recover the concrete implementation.
///
/// In JSON an empty envelope and a value encoding as `null` share one form;
/// the JSON decoder reads `null` as the value whenever `V` accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope<V> {
	value: Option<V>,
}

impl<V> Envelope<V> {
	/// Creates an empty envelope.
	pub fn new() -> Self {
		Self { value: None }
	}

	/// Creates an envelope holding `value`.
	pub fn wrap(value: V) -> Self {
		Self { value: Some(value) }
	}

	/// Stores `value`, returning whatever was held before.
	pub fn set(&mut self, value: V) -> Option<V> {
		self.value.replace(value)
	}

	pub fn get(&self) -> Option<&V> {
		self.value.as_ref()
	}

	/// Consumes the envelope, returning its value if it holds one.
	pub fn into_inner(self) -> Option<V> {
		self.value
	}

	pub fn is_empty(&self) -> bool {
		self.value.is_none()
	}
}

impl<V> Default for Envelope<V> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_envelope_holds_nothing() {
		let env: Envelope<u32> = Envelope::new();
		assert!(env.is_empty());
		assert_eq!(env.get(), None);
		assert_eq!(env.into_inner(), None);
	}

	#[test]
	fn set_replaces_previous_value() {
		let mut env = Envelope::wrap(1u32);
		assert_eq!(env.set(2), Some(1));
		assert_eq!(env.get(), Some(&2));
		assert_eq!(env.into_inner(), Some(2));
	}

	#[test]
	fn serializes_as_inner_value() {
		let json = serde_json::to_string(&Envelope::wrap(7u8)).unwrap();
		assert_eq!(json, "7");
		let back: Envelope<u8> = serde_json::from_str("null").unwrap();
		assert!(back.is_empty());
	}
}
