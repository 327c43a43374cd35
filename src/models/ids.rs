//! Strongly-typed ID wrappers for all entity types
//!
//! Ids display as a short prefixed form (`je-1a2b3c4d`). The CLI accepts
//! either the full UUID or that short form, so lookups go through
//! [`matches`](EntryId::matches) rather than parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Whether `s` names this id: the full UUID, the short display
            /// form, or a UUID prefix of at least 4 characters
            pub fn matches(&self, s: &str) -> bool {
                let s = s.trim().to_ascii_lowercase();
                let s = s.strip_prefix($display_prefix).unwrap_or(&s);
                s.len() >= 4 && self.0.to_string().starts_with(s)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(EntryId, "je-");
define_id!(CashFlowId, "cf-");
define_id!(PartnerId, "pt-");
define_id!(MovementId, "mv-");
define_id!(ProductId, "pr-");
define_id!(StockMovementId, "sm-");
define_id!(TaxObligationId, "tx-");
