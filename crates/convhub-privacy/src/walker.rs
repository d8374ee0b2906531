//! Structural walker over JSON values
//!
//! Strings are redacted, arrays and objects are rebuilt with the same length
//! and key set, every other scalar is copied as is. Object keys are never
//! redacted. Nesting deeper than the policy's `max_depth` fails closed with
//! [`FilterError::DepthExceeded`]; no partially filtered value is returned.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use convhub_core::{CategoryId, FilterError, FilterPolicy, Result};

use crate::redactor::Redactor;

/// Per-category totals over a whole payload
pub type CategoryCounts = BTreeMap<CategoryId, usize>;

impl Redactor {
    /// Redact every string leaf of `value`
    pub fn walk(&self, value: &Value, policy: &FilterPolicy) -> Result<Value> {
        self.walk_with_summary(value, policy).map(|(walked, _)| walked)
    }

    /// Like [`Redactor::walk`], also returning substitutions per category
    pub fn walk_with_summary(
        &self,
        value: &Value,
        policy: &FilterPolicy,
    ) -> Result<(Value, CategoryCounts)> {
        let mut summary = CategoryCounts::new();
        let walked = self.walk_node(value, policy, 0, &mut summary)?;
        Ok((walked, summary))
    }

    /// Walk a typed value.
    ///
    /// Values serde cannot represent as JSON (e.g. maps with non-string keys)
    /// are rejected instead of being stringified.
    pub fn walk_serializable<T: Serialize + ?Sized>(
        &self,
        value: &T,
        policy: &FilterPolicy,
    ) -> Result<Value> {
        let value = serde_json::to_value(value)
            .map_err(|e| FilterError::InvalidInput(format!("value is not JSON-representable: {e}")))?;
        self.walk(&value, policy)
    }

    /// Decode a JSON document and walk it
    pub fn walk_bytes(&self, bytes: &[u8], policy: &FilterPolicy) -> Result<(Value, CategoryCounts)> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| FilterError::InvalidInput(format!("body is not valid JSON: {e}")))?;
        self.walk_with_summary(&value, policy)
    }

    fn walk_node(
        &self,
        value: &Value,
        policy: &FilterPolicy,
        depth: usize,
        summary: &mut CategoryCounts,
    ) -> Result<Value> {
        match value {
            Value::String(text) => {
                let result = self.redact(text, policy);
                for (category, count) in result.categories_filtered {
                    *summary.entry(category).or_insert(0) += count;
                }
                Ok(Value::String(result.filtered_text))
            }
            Value::Array(items) => {
                let depth = descend(depth, policy)?;
                items
                    .iter()
                    .map(|item| self.walk_node(item, policy, depth, summary))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            Value::Object(fields) => {
                let depth = descend(depth, policy)?;
                let mut walked = Map::with_capacity(fields.len());
                for (key, field) in fields {
                    walked.insert(key.clone(), self.walk_node(field, policy, depth, summary)?);
                }
                Ok(Value::Object(walked))
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.clone()),
        }
    }
}

/// Depth of the container being entered, or an error past the limit
fn descend(depth: usize, policy: &FilterPolicy) -> Result<usize> {
    let next = depth + 1;
    if next > policy.max_depth() {
        return Err(FilterError::DepthExceeded {
            limit: policy.max_depth(),
        });
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn email_only() -> FilterPolicy {
        FilterPolicy::builder()
            .categories([CategoryId::Email])
            .build()
            .unwrap()
    }

    #[test]
    fn test_nested_payload() {
        let redactor = Redactor::new();
        let input = json!({
            "transcript": "contact: test@x.nl",
            "count": 3,
            "tags": ["a", "test@x.nl"]
        });

        let (output, summary) = redactor.walk_with_summary(&input, &email_only()).unwrap();

        assert_eq!(
            output,
            json!({
                "transcript": "contact: [PRIVACY_FILTERED]",
                "count": 3,
                "tags": ["a", "[PRIVACY_FILTERED]"]
            })
        );
        assert_eq!(summary.get(&CategoryId::Email), Some(&2));
    }

    #[test]
    fn test_keys_are_not_redacted() {
        let redactor = Redactor::new();
        let input = json!({ "test@x.nl": "test@x.nl" });
        let output = redactor.walk(&input, &email_only()).unwrap();
        assert_eq!(output, json!({ "test@x.nl": "[PRIVACY_FILTERED]" }));
    }

    #[test]
    fn test_scalars_unchanged() {
        let redactor = Redactor::new();
        let policy = FilterPolicy::default();
        for value in [json!(null), json!(true), json!(111222333), json!(0.5)] {
            assert_eq!(redactor.walk(&value, &policy).unwrap(), value);
        }
    }

    #[test]
    fn test_top_level_string() {
        let redactor = Redactor::new();
        let output = redactor
            .walk(&json!("bel 0612345678"), &FilterPolicy::default())
            .unwrap();
        assert_eq!(output, json!("bel [PRIVACY_FILTERED]"));
    }

    #[test]
    fn test_depth_limit() {
        let redactor = Redactor::new();
        let shallow = FilterPolicy::builder().max_depth(2).build().unwrap();

        assert!(redactor.walk(&json!({"a": ["x"]}), &shallow).is_ok());

        let err = redactor
            .walk(&json!({"a": [{"b": "test@x.nl"}]}), &shallow)
            .unwrap_err();
        assert!(matches!(err, FilterError::DepthExceeded { limit: 2 }));
    }

    #[test]
    fn test_deep_nesting_within_default_limit() {
        let redactor = Redactor::new();
        let mut value = json!("test@x.nl");
        for _ in 0..100 {
            value = json!([value]);
        }
        let mut walked = redactor.walk(&value, &FilterPolicy::default()).unwrap();
        for _ in 0..100 {
            walked = walked[0].take();
        }
        assert_eq!(walked, json!("[PRIVACY_FILTERED]"));
    }

    #[test]
    fn test_walk_bytes_rejects_invalid_json() {
        let redactor = Redactor::new();
        let err = redactor
            .walk_bytes(b"{not json", &FilterPolicy::default())
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidInput(_)));
    }

    #[test]
    fn test_walk_serializable() {
        #[derive(Serialize)]
        struct Section {
            title: String,
            content: String,
        }

        let redactor = Redactor::new();
        let section = Section {
            title: "Afspraken".to_string(),
            content: "Bel 0612345678".to_string(),
        };
        let output = redactor
            .walk_serializable(&section, &FilterPolicy::default())
            .unwrap();
        assert_eq!(
            output,
            json!({"title": "Afspraken", "content": "Bel [PRIVACY_FILTERED]"})
        );
    }

    #[test]
    fn test_walk_serializable_rejects_non_string_keys() {
        let redactor = Redactor::new();
        let mut map = HashMap::new();
        map.insert((1, 2), "x");
        let err = redactor
            .walk_serializable(&map, &FilterPolicy::default())
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidInput(_)));
    }
}
