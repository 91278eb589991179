//! ID type wrappers for type safety.
//!
//! Identifiers are opaque strings issued by the remote data store; nothing in the
//! domain interprets their contents.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Stable identifier of a quote row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

/// Identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl_id!(QuoteId, UserId);
