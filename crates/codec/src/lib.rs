//! Hybrid polymorphic serialization.
//!
//! Domain values are often referenced only through a capability trait
//! (`dyn Account`, `dyn SupplyI`) whose concrete implementation varies
//! between application versions. [`HybridCodec`] encodes such values in two
//! incompatible formats:
//!
//! * the modern self-describing format (postcard binary, JSON), where the
//!   value is wrapped in an [`Envelope`] and the concrete type travels as a
//!   `typetag` name, requiring no registration;
//! * the [`legacy`] tag-prefixed format, which only works for types registered
//!   up front in a [`LegacyCodecBuilder`].
//!
//! Callers choose the format explicitly; the preferred binary and JSON entry
//! points never fall back to the legacy layout.

pub mod config;
pub mod envelope;
pub mod error;
pub mod hybrid;
pub mod legacy;
mod modern;

pub use config::CodecConfig;
pub use envelope::Envelope;
pub use error::{CodecError, ErrorKind, RegisterError, Result, WireFormat};
pub use hybrid::HybridCodec;
pub use legacy::{AnyValue, ConcreteRegistration, LegacyCodec, LegacyCodecBuilder, TypeRegistration};
