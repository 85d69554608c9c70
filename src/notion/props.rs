//! Readers and builders for Notion property values.
//!
//! Notion records are property bags keyed by field name, each value wrapped
//! in a type tag (`select`, `rich_text`, `title`, `number`, `multi_select`).
//! Readers are lenient: a missing or differently-typed property reads as
//! empty/None rather than an error, since the remote schema is not ours.

use serde_json::{json, Value};

/// Plain text from a title or rich_text property, fragments joined.
pub fn plain_text(prop: &Value) -> String {
    for key in ["title", "rich_text"] {
        if let Some(fragments) = prop.get(key).and_then(Value::as_array) {
            if !fragments.is_empty() {
                return fragments
                    .iter()
                    .filter_map(|f| f.get("plain_text").and_then(Value::as_str))
                    .collect();
            }
        }
    }
    String::new()
}

/// Name of a single-select property, or empty.
pub fn select_name(prop: &Value) -> String {
    prop.get("select")
        .and_then(|s| s.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Number property value, None when unset.
pub fn number(prop: &Value) -> Option<f64> {
    prop.get("number").and_then(Value::as_f64)
}

pub fn title(content: &str) -> Value {
    json!({ "title": [{ "text": { "content": content } }] })
}

/// Rich-text property; blank input maps to an empty fragment list.
pub fn rich_text(content: &str) -> Value {
    if content.is_empty() {
        json!({ "rich_text": [] })
    } else {
        json!({ "rich_text": [{ "text": { "content": content } }] })
    }
}

pub fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

pub fn number_value(n: Option<f64>) -> Value {
    json!({ "number": n })
}

pub fn multi_select(names: &[String]) -> Value {
    let options: Vec<Value> = names.iter().map(|name| json!({ "name": name })).collect();
    json!({ "multi_select": options })
}
