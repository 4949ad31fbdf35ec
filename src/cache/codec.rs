//! Value codecs for cached entries.
//!
//! Two modes are available and the caller picks one per call site:
//!
//! - [`StringCodec`] stores a value's `Display` form as UTF-8 and parses it
//!   back with `FromStr`. For `String` the text comes back unchanged.
//! - [`JsonCodec`] stores a JSON envelope holding a type discriminator and the
//!   value's structure, so decoding rebuilds the concrete type.
//!
//! Polymorphic values are expressed as a closed set of variants, i.e. a serde
//! internally-tagged enum, rather than an open registry of types:
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! #[serde(tag = "kind")]
//! enum Shape {
//!     Circle { radius: f64 },
//!     Square { side: f64 },
//! }
//! ```

use std::any::type_name;
use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cache::CacheError;

/// Converts values to and from the bytes stored in the cache.
pub trait ValueCodec<V>: Send + Sync {
    fn encode(&self, value: &V) -> Result<Vec<u8>, CacheError>;

    /// Malformed or truncated input yields [`CacheError::Deserialization`].
    fn decode(&self, bytes: &[u8]) -> Result<V, CacheError>;
}

/// Plain text mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl<V> ValueCodec<V> for StringCodec
where
    V: Display + FromStr,
    V::Err: Display,
{
    fn encode(&self, value: &V) -> Result<Vec<u8>, CacheError> {
        Ok(value.to_string().into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<V, CacheError> {
        let text =
            std::str::from_utf8(bytes).map_err(|e| CacheError::Deserialization(e.to_string()))?;
        text.parse::<V>()
            .map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, V> {
    #[serde(rename = "@type")]
    type_tag: &'a str,
    value: &'a V,
}

#[derive(Deserialize)]
struct Envelope<V> {
    #[serde(rename = "@type")]
    type_tag: String,
    value: V,
}

/// Typed-object mode backed by `serde_json`.
///
/// Every envelope carries a discriminator. An entry whose discriminator does
/// not match this codec's fails to decode, which the resolver treats as a
/// miss. Unknown fields are ignored on decode.
///
/// [`JsonCodec::new`] uses the Rust type name of `V`, which can change with
/// the compiler version or when the type moves between modules. Entries that
/// must survive such changes should use [`JsonCodec::with_tag`].
pub struct JsonCodec<V> {
    tag: &'static str,
    _marker: PhantomData<fn() -> V>,
}

impl<V> JsonCodec<V> {
    pub fn new() -> Self {
        Self::with_tag(type_name::<V>())
    }

    /// Use a fixed discriminator, e.g. `"user.v1"`.
    pub fn with_tag(tag: &'static str) -> Self {
        Self {
            tag,
            _marker: PhantomData,
        }
    }

    /// The discriminator written into every envelope.
    pub fn type_tag(&self) -> &'static str {
        self.tag
    }
}

impl<V> Default for JsonCodec<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for JsonCodec<V> {
    fn clone(&self) -> Self {
        Self::with_tag(self.tag)
    }
}

impl<V> std::fmt::Debug for JsonCodec<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonCodec").field("tag", &self.tag).finish()
    }
}

impl<V> ValueCodec<V> for JsonCodec<V>
where
    V: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &V) -> Result<Vec<u8>, CacheError> {
        let envelope = EnvelopeRef {
            type_tag: self.tag,
            value,
        };
        serde_json::to_vec(&envelope).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<V, CacheError> {
        let envelope: Envelope<V> = serde_json::from_slice(bytes)
            .map_err(|e| CacheError::Deserialization(e.to_string()))?;

        if envelope.type_tag != self.tag {
            return Err(CacheError::Deserialization(format!(
                "expected type '{}', found '{}'",
                self.tag, envelope.type_tag
            )));
        }
        Ok(envelope.value)
    }
}
