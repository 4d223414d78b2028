//! Typed identifiers for users and ledger entities
//!
//! Every id is a random UUID behind its own newtype, so an account id can
//! never be handed to a transaction lookup. Ids print in a short prefixed
//! form for tables (`acc-1a2b3c4d`); the alternate form (`{:#}`) prints the
//! whole UUID with its prefix and parses back to the same id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// An identifier that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a valid {entity} id")]
pub struct IdParseError {
    /// Kind of entity the id was meant for, e.g. "account"
    pub entity: &'static str,
    pub input: String,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// A fresh random id
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if f.alternate() {
                    write!(f, "{}{}", $prefix, self.0)
                } else {
                    let full = self.0.simple().to_string();
                    write!(f, "{}{}", $prefix, &full[..8])
                }
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            /// Accepts a bare UUID or one carrying this id's prefix, in any case
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_prefixed(s, $prefix)
                    .map(Self)
                    .ok_or_else(|| IdParseError {
                        entity: $entity,
                        input: s.to_string(),
                    })
            }
        }
    };
}

fn parse_prefixed(input: &str, prefix: &str) -> Option<Uuid> {
    let trimmed = input.trim();
    let body = match trimmed.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &trimmed[prefix.len()..],
        _ => trimmed,
    };
    Uuid::parse_str(body).ok()
}

define_id!(
    /// A registered user; every other entity except categories belongs to one
    UserId, "usr-", "user"
);
define_id!(AccountId, "acc-", "account");
define_id!(TransactionId, "txn-", "transaction");
define_id!(
    /// A category in the shared registry
    CategoryId, "cat-", "category"
);
define_id!(BudgetId, "bud-", "budget");
define_id!(GoalId, "goal-", "goal");
