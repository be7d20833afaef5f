pub mod analysis;
pub mod contract;
pub mod portfolio;
pub mod recommendation;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Label/value pairs shown as a grid of cards (technical indicators, fundamental metrics).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricList(pub Vec<(String, String)>);

impl MetricList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == label).map(|(_, v)| v)
    }
}

impl<'de> Deserialize<'de> for MetricList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MetricListVisitor;

        impl<'de> Visitor<'de> for MetricListVisitor {
            type Value = MetricList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of metric names to values")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((label, value)) = map.next_entry::<String, Value>()? {
                    out.push((label, display_value(value)));
                }
                Ok(MetricList(out))
            }
        }

        deserializer.deserialize_map(MetricListVisitor)
    }
}

fn display_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metric_list_keeps_backend_order_and_stringifies_values() {
        // Parse from text: a `serde_json::Value` map would already be key-sorted.
        let list: MetricList = serde_json::from_str(
            r#"{"RSI": "55", "MACD": -1.25, "ADX": null, "Above200DMA": true}"#,
        )
        .unwrap();

        let labels: Vec<_> = list.iter().map(|(k, _)| k).collect();
        assert_eq!(labels, ["RSI", "MACD", "ADX", "Above200DMA"]);
        assert_eq!(list.get("MACD"), Some("-1.25"));
        assert_eq!(list.get("ADX"), Some("N/A"));
        assert_eq!(list.get("Above200DMA"), Some("true"));
    }

    #[test]
    fn metric_list_rejects_non_map() {
        assert!(serde_json::from_value::<MetricList>(json!(["RSI"])).is_err());
    }
}
