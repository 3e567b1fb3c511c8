//! Raw shapes of feed payloads.
//!
//! Every scalar is optional and decoded leniently: the server sometimes
//! sends numbers as strings and ids as numbers. Validation happens in
//! [`parse`](super::parse) where a missing field can be attributed to the
//! record that lacks it.
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct Envelope {
    #[serde(default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub message: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireSnapshot {
    #[serde(default, deserialize_with = "lenient_int")]
    pub map_width: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub map_height: Option<i64>,
    #[serde(default)]
    pub tiles: Option<Vec<WireTile>>,
    #[serde(default)]
    pub players: Option<Vec<WirePlayer>>,
    #[serde(default)]
    pub items: Option<Vec<WireItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireTile {
    #[serde(default, deserialize_with = "lenient_int")]
    pub x: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub y: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub flag: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub team: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WirePlayer {
    #[serde(default, deserialize_with = "lenient_int")]
    pub x: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub y: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default)]
    pub class: Option<Value>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub team: Option<i64>,
    /// The carried item, serialized in full.
    #[serde(default)]
    pub item: Option<WireItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub x: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub y: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireUpdate {
    #[serde(default)]
    pub player_changes: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub item_changes: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WirePlayerChange {
    #[serde(default, deserialize_with = "lenient_int")]
    pub x: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub y: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub prev_x: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub prev_y: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub item_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireItemChange {
    #[serde(default, deserialize_with = "lenient_int")]
    pub x: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub y: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub prev_x: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub prev_y: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub item_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct WireFight {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub attacker_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub defender_id: Option<String>,
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(integer(&Value::deserialize(deserializer)?))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) if !text.is_empty() => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// Integral value of a JSON number or numeric string.
pub(super) fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().and_then(integral)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}
