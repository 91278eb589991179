//! Wire rows that differ from the domain models.

use qf_core::{QuoteId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct LikedQuoteRow<'a> {
    pub user_id: &'a UserId,
    pub quote_id: &'a QuoteId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LikedQuoteIdRow {
    pub quote_id: QuoteId,
}

/// PostgREST array literal for `ov.` / `cs.` filters: `{"a","b"}`.
pub(crate) fn array_literal<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    let items: Vec<String> = values
        .into_iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("{{{}}}", items.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_literal_quotes_each_value() {
        let values = vec!["love".to_string(), "say \"hi\"".to_string()];
        assert_eq!(array_literal(&values), r#"{"love","say \"hi\""}"#);
    }

    #[test]
    fn test_liked_row_serializes_snake_case() {
        let user_id = UserId::from("u1");
        let quote_id = QuoteId::from("q1");
        let json = serde_json::to_value(LikedQuoteRow {
            user_id: &user_id,
            quote_id: &quote_id,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "user_id": "u1", "quote_id": "q1" }));
    }
}
