//! Quote domain model
//!
//! 双语语录。A quote is immutable once fetched from the remote store.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{QuoteId, UserId};

/// Category tag attached to quotes and selected in preferences.
pub type Category = String;

/// A bilingual quote.
///
/// 一条中英双语语录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    /// English text
    pub text_en: String,
    /// Chinese text / 中文
    pub text_zh: String,
    #[serde(default)]
    pub categories: BTreeSet<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
}

impl Quote {
    pub fn new(id: impl Into<QuoteId>, text_en: impl Into<String>, text_zh: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text_en: text_en.into(),
            text_zh: text_zh.into(),
            categories: BTreeSet::new(),
            created_at: None,
            created_by: None,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Category>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted_when_absent() {
        let quote = Quote::new("q1", "a", "b");
        let json = serde_json::to_value(&quote).unwrap();
        assert!(json.get("created_at").is_none());
        assert!(json.get("created_by").is_none());
    }

    #[test]
    fn test_deserialize_tolerates_missing_categories() {
        let quote: Quote =
            serde_json::from_str(r#"{"id":"q9","text_en":"hi","text_zh":"你好"}"#).unwrap();
        assert!(quote.categories.is_empty());
        assert_eq!(quote.id, QuoteId::from("q9"));
    }
}
