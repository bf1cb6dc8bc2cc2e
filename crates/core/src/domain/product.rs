use std::fmt;

use serde_json::{Map, Number, Value};

use crate::errors::RecordSkip;

/// Typed view over one raw marketplace product record.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub price: String,
    pub main_attribute: Value,
    pub rating: RatingSummary,
    pub is_available: bool,
    pub is_free_shipping: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RatingSummary {
    Average(Number),
    Label(String),
    Unknown,
}

impl fmt::Display for RatingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Average(average) => write!(f, "{average}"),
            Self::Label(label) => f.write_str(label),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

impl ProductRecord {
    /// Reads the required fields out of a raw record.
    ///
    /// The marketplace spells availability as either `isAvailable` or
    /// `IsAvailable`; both are accepted.
    pub fn from_value(raw: &Value) -> Result<Self, RecordSkip> {
        let fields = raw.as_object().ok_or(RecordSkip::NotAnObject)?;

        let name = match required(fields, &["name"], "name")? {
            Value::String(name) => name.clone(),
            _ => return Err(RecordSkip::InvalidField { field: "name" }),
        };

        let price = match required(fields, &["price"], "price")? {
            Value::Number(price) => price.to_string(),
            Value::String(price) if !price.trim().is_empty() => price.trim().to_string(),
            _ => return Err(RecordSkip::InvalidField { field: "price" }),
        };

        let main_attribute = fields
            .get("mainAttribute")
            .cloned()
            .ok_or(RecordSkip::MissingField("mainAttribute"))?;

        let is_available =
            read_flag(required(fields, &["isAvailable", "IsAvailable"], "isAvailable")?)
                .ok_or(RecordSkip::InvalidField { field: "isAvailable" })?;
        let is_free_shipping = read_flag(required(fields, &["isFreeShipping"], "isFreeShipping")?)
            .ok_or(RecordSkip::InvalidField { field: "isFreeShipping" })?;

        Ok(Self {
            name,
            price,
            main_attribute,
            rating: read_rating(fields.get("rating")),
            is_available,
            is_free_shipping,
        })
    }
}

fn required<'a>(
    fields: &'a Map<String, Value>,
    keys: &[&str],
    field: &'static str,
) -> Result<&'a Value, RecordSkip> {
    keys.iter()
        .find_map(|key| fields.get(*key).filter(|value| !value.is_null()))
        .ok_or(RecordSkip::MissingField(field))
}

fn read_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|number| number != 0.0),
        _ => None,
    }
}

fn read_rating(rating: Option<&Value>) -> RatingSummary {
    match rating.and_then(|rating| rating.get("average")) {
        Some(Value::Number(average)) => RatingSummary::Average(average.clone()),
        Some(Value::String(label)) if !label.trim().is_empty() => {
            RatingSummary::Label(label.trim().to_string())
        }
        _ => RatingSummary::Unknown,
    }
}
