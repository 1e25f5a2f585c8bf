use serde_json::{Map, Value};

use crate::record::Record;

/// Upstream keys never copied into `extra`.
pub const EXTRA_EXCLUDED_KEYS: [&str; 5] = ["image", "target_image", "question", "answer", "prompt"];

/// Metadata for the lenient layout, keys in their persisted order.
///
/// `extra` carries every remaining upstream field except binary payloads.
pub fn build_metadata(
    domain: &str,
    task_id: &str,
    source: &str,
    split: &str,
    record: &Record,
) -> Map<String, Value> {
    let difficulty = record
        .get("difficulty")
        .and_then(|v| v.to_json())
        .unwrap_or(Value::Null);

    let extra: Map<String, Value> = record
        .iter()
        .filter(|(k, _)| !EXTRA_EXCLUDED_KEYS.contains(k))
        .filter_map(|(k, v)| v.to_json().map(|json| (k.to_string(), json)))
        .collect();

    let mut meta = Map::new();
    meta.insert("domain".into(), Value::String(domain.to_string()));
    meta.insert("task_id".into(), Value::String(task_id.to_string()));
    meta.insert("difficulty".into(), difficulty);
    meta.insert("source".into(), Value::String(source.to_string()));
    meta.insert("split".into(), Value::String(split.to_string()));
    meta.insert("extra".into(), Value::Object(extra));
    meta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn keys_keep_persisted_order() {
        let meta = build_metadata("maze", "vtb_test_00000", "src", "test", &Record::new());
        let keys: Vec<&str> = meta.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["domain", "task_id", "difficulty", "source", "split", "extra"]
        );
        assert_eq!(meta["difficulty"], Value::Null);
    }

    #[test]
    fn extra_drops_consumed_text_and_binary_fields() {
        let record = Record::new()
            .with("question", "q")
            .with("answer", "a")
            .with("prompt", "p")
            .with("task_type", "maze")
            .with("difficulty", "hard")
            .with("raw", FieldValue::Bytes(vec![1, 2, 3]))
            .with("seed", 7i64);

        let meta = build_metadata("maze", "id", "src", "test", &record);
        assert_eq!(meta["difficulty"], json!("hard"));
        assert_eq!(
            Value::Object(meta["extra"].as_object().cloned().unwrap()),
            json!({"task_type": "maze", "difficulty": "hard", "seed": 7})
        );
    }
}
