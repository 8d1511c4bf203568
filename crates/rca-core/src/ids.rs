#![forbid(unsafe_code)]

//! Typed identifiers for nodes, personas, and intervention bundles.
//!
//! Identifiers are opaque strings on the wire so that documents written by
//! other tools (`"root"`, `"node-k2f9x-1712345678"`) import unchanged. Freshly
//! generated identifiers wrap a UUIDv7, which combines a millisecond timestamp
//! with random bits and is therefore unique for the lifetime of a document.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a [`CauseNode`](crate::node::CauseNode).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

/// Identifier of a [`Persona`](crate::diagram::Persona).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonaId(String);

/// Identifier of a [`TocBundle`](crate::toc::TocBundle).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleId(String);

macro_rules! impl_typed_id {
    ($T:ident, $prefix:literal) => {
        impl $T {
            /// Generate a fresh, time-ordered identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(format!(
                    concat!($prefix, "-{}"),
                    uuid::Uuid::now_v7().as_simple()
                ))
            }

            /// Wrap an existing identifier string.
            #[must_use]
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// The identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the identifier, returning the inner string.
            #[must_use]
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($T), "({})"), self.0)
            }
        }

        impl From<&str> for $T {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }

        impl From<String> for $T {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl AsRef<str> for $T {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $T {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $T {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $T {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

impl_typed_id!(NodeId, "node");
impl_typed_id!(PersonaId, "persona");
impl_typed_id!(BundleId, "bundle");
