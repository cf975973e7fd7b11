use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Fear & Greed Index data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FearGreedData {
    #[serde(default = "default_fear_greed_value")]
    pub value: i32,
    #[serde(default = "default_classification")]
    pub classification: String,
    #[serde(default)]
    pub timestamp: String,
}

fn default_fear_greed_value() -> i32 {
    50
}

fn default_classification() -> String {
    "Neutral".to_string()
}

impl FearGreedData {
    /// Build a reading from a numeric index value.
    pub fn from_value(value: i32) -> Self {
        Self {
            value,
            classification: Self::classify(value).to_string(),
            timestamp: String::new(),
        }
    }

    /// Get the classification for a fear & greed value.
    pub fn classify(value: i32) -> &'static str {
        match value {
            i32::MIN..=24 => "Extreme Fear",
            25..=44 => "Fear",
            45..=55 => "Neutral",
            56..=75 => "Greed",
            _ => "Extreme Greed",
        }
    }

    /// Classification to use for gating; derived from the value when the
    /// source left it blank.
    pub fn effective_classification(&self) -> &str {
        if self.classification.trim().is_empty() {
            Self::classify(self.value)
        } else {
            self.classification.trim()
        }
    }
}

/// A parsed fundamental field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Unavailable,
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Unavailable => None,
        }
    }
}

/// Company fundamentals keyed by screener field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalFields {
    fields: BTreeMap<String, FieldValue>,
}

impl FundamentalFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw screener strings; anything unparsable is kept as unavailable.
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        let fields = raw
            .iter()
            .map(|(name, value)| {
                let parsed = sanitize_number(value)
                    .map(FieldValue::Number)
                    .unwrap_or(FieldValue::Unavailable);
                (name.clone(), parsed)
            })
            .collect();
        Self { fields }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let value = if value.is_finite() {
            FieldValue::Number(value)
        } else {
            FieldValue::Unavailable
        };
        self.fields.insert(name.into(), value);
    }

    pub fn insert_unavailable(&mut self, name: impl Into<String>) {
        self.fields.insert(name.into(), FieldValue::Unavailable);
    }

    /// Numeric value of a field, `None` when missing or unavailable.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(FieldValue::as_f64)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse a screener number such as `"12.5%"`, `"1,204"` or `"3.2B"`.
///
/// Returns `None` for placeholders like `"-"` and for anything non-numeric.
pub fn sanitize_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '%' | ',' | '$'))
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    let (digits, scale) = match cleaned.chars().last() {
        Some('K') | Some('k') => (&cleaned[..cleaned.len() - 1], 1e3),
        Some('M') | Some('m') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some('B') | Some('b') => (&cleaned[..cleaned.len() - 1], 1e9),
        Some('T') | Some('t') => (&cleaned[..cleaned.len() - 1], 1e12),
        _ => (cleaned.as_str(), 1.0),
    };

    digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_number() {
        assert_eq!(sanitize_number("14.20"), Some(14.2));
        assert_eq!(sanitize_number(" 12.5% "), Some(12.5));
        assert_eq!(sanitize_number("1,204"), Some(1204.0));
        assert_eq!(sanitize_number("3.2B"), Some(3.2e9));
        assert_eq!(sanitize_number("-4.1%"), Some(-4.1));
        assert_eq!(sanitize_number("-"), None);
        assert_eq!(sanitize_number(""), None);
        assert_eq!(sanitize_number("N/A"), None);
        assert_eq!(sanitize_number("inf"), None);
    }

    #[test]
    fn test_fields_from_raw() {
        let mut raw = HashMap::new();
        raw.insert("P/E".to_string(), "-".to_string());
        raw.insert("Forward P/E".to_string(), "15.1".to_string());
        let fields = FundamentalFields::from_raw(&raw);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("P/E"), None);
        assert_eq!(fields.get("Forward P/E"), Some(15.1));
        assert_eq!(fields.get("Missing"), None);
    }

    #[test]
    fn test_effective_classification() {
        let blank = FearGreedData {
            value: 30,
            classification: "  ".to_string(),
            timestamp: String::new(),
        };
        assert_eq!(blank.effective_classification(), "Fear");
        assert_eq!(FearGreedData::from_value(80).classification, "Extreme Greed");
    }
}
