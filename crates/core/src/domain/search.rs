use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::errors::SchemaError;

pub const DEFAULT_MIN_RATING: u8 = 4;
pub const MAX_RATING: u8 = 5;

/// Structured search call derived from a shopping request.
///
/// Price bounds are passed through as given: negative values and
/// `min_price > max_price` are not rejected here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: String,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_rating: u8,
    pub free_shipping: bool,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            min_price: None,
            max_price: None,
            min_rating: DEFAULT_MIN_RATING,
            free_shipping: false,
        }
    }

    /// Validates raw tool-call arguments, coercing loosely typed values and
    /// substituting defaults for absent optional fields.
    pub fn from_arguments(arguments: &Value) -> Result<Self, SchemaError> {
        let fields = arguments.as_object().ok_or(SchemaError::NotAnObject)?;

        let query = match fields.get("query") {
            None | Some(Value::Null) => return Err(SchemaError::MissingField("query")),
            Some(Value::String(raw)) => raw.trim().to_string(),
            Some(_) => return Err(SchemaError::InvalidType { field: "query", expected: "a string" }),
        };
        if query.is_empty() {
            return Err(SchemaError::EmptyQuery);
        }

        let min_price = read_integer(fields, "minPrice")?;
        let max_price = read_integer(fields, "maxPrice")?;

        let min_rating = match read_integer(fields, "minRating")? {
            None => DEFAULT_MIN_RATING,
            Some(value) if (0..=i64::from(MAX_RATING)).contains(&value) => value as u8,
            Some(value) => return Err(SchemaError::OutOfRange { field: "minRating", value }),
        };

        let free_shipping = read_flag(fields, "freeShipping")?.unwrap_or(false);

        Ok(Self { query, min_price, max_price, min_rating, free_shipping })
    }

    pub fn with_price_range(mut self, min_price: Option<i64>, max_price: Option<i64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn with_min_rating(mut self, min_rating: u8) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn with_free_shipping(mut self, free_shipping: bool) -> Self {
        self.free_shipping = free_shipping;
        self
    }

    /// Wire form of the free-shipping flag (`0` = all products, `1` = free shipping only).
    pub fn free_shipping_flag(&self) -> u8 {
        u8::from(self.free_shipping)
    }
}

/// JSON Schema for the `search_products` tool arguments.
pub fn search_arguments_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Search term for products (e.g., mobile phone, laptop, natural honey)",
                "examples": ["گوشی موبایل", "لپ‌تاپ", "عسل طبیعی", "کتاب"]
            },
            "minPrice": {
                "type": "integer",
                "description": "Minimum product price in Tomans (optional)",
                "examples": [100000, 500000, 1000000]
            },
            "maxPrice": {
                "type": "integer",
                "description": "Maximum product price in Tomans (optional)",
                "examples": [5000000, 20000000, 50000000]
            },
            "minRating": {
                "type": "integer",
                "description": "Minimum product rating out of 5 (default: 4)",
                "minimum": 0,
                "maximum": MAX_RATING,
                "default": DEFAULT_MIN_RATING
            },
            "freeShipping": {
                "type": "integer",
                "description": "Only products with free shipping (0: all, 1: free shipping only)",
                "enum": [0, 1],
                "default": 0
            }
        },
        "required": ["query"]
    })
}

fn read_integer(fields: &Map<String, Value>, field: &'static str) -> Result<Option<i64>, SchemaError> {
    let invalid = SchemaError::InvalidType { field, expected: "an integer" };
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.fract() == 0.0 && value.abs() < i64::MAX as f64)
                    .map(|value| value as i64)
            })
            .map(Some)
            .ok_or(invalid),
        Some(Value::String(raw)) => {
            let normalized = normalize_digits(raw);
            if normalized.is_empty() {
                return Ok(None);
            }
            normalized.parse::<i64>().map(Some).map_err(|_| invalid)
        }
        Some(_) => Err(invalid),
    }
}

fn read_flag(fields: &Map<String, Value>, field: &'static str) -> Result<Option<bool>, SchemaError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(Value::String(raw)) if raw.trim().eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(Value::String(raw)) if raw.trim().eq_ignore_ascii_case("false") => Ok(Some(false)),
        _ => match read_integer(fields, field)? {
            None => Ok(None),
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            Some(value) => Err(SchemaError::OutOfRange { field, value }),
        },
    }
}

/// Maps Persian and Arabic-Indic digits to ASCII and drops thousands separators.
fn normalize_digits(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|character| !matches!(character, ',' | '_' | '٬' | ' '))
        .map(|character| match character {
            '۰'..='۹' => char::from(b'0' + (character as u32 - '۰' as u32) as u8),
            '٠'..='٩' => char::from(b'0' + (character as u32 - '٠' as u32) as u8),
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{search_arguments_schema, SearchQuery, DEFAULT_MIN_RATING};
    use crate::errors::SchemaError;

    #[test]
    fn absent_optional_fields_take_defaults() {
        let query = SearchQuery::from_arguments(&json!({ "query": "لپ‌تاپ" })).expect("valid");

        assert_eq!(query.query, "لپ‌تاپ");
        assert_eq!(query.min_price, None);
        assert_eq!(query.max_price, None);
        assert_eq!(query.min_rating, DEFAULT_MIN_RATING);
        assert!(!query.free_shipping);
    }

    #[test]
    fn loosely_typed_values_are_coerced() {
        let query = SearchQuery::from_arguments(&json!({
            "query": "  گوشی ",
            "maxPrice": "15,000,000",
            "minPrice": 2000000.0,
            "minRating": "3",
            "freeShipping": true
        }))
        .expect("valid");

        assert_eq!(query.query, "گوشی");
        assert_eq!(query.max_price, Some(15_000_000));
        assert_eq!(query.min_price, Some(2_000_000));
        assert_eq!(query.min_rating, 3);
        assert_eq!(query.free_shipping_flag(), 1);
    }

    #[test]
    fn persian_digits_are_accepted() {
        let query = SearchQuery::from_arguments(&json!({
            "query": "عسل طبیعی",
            "maxPrice": "۵۰۰۰۰۰",
            "freeShipping": "1"
        }))
        .expect("valid");

        assert_eq!(query.max_price, Some(500_000));
        assert!(query.free_shipping);
    }

    #[test]
    fn null_fields_behave_like_absent_fields() {
        let query = SearchQuery::from_arguments(&json!({
            "query": "کتاب",
            "minPrice": null,
            "minRating": null,
            "freeShipping": null
        }))
        .expect("valid");

        assert_eq!(query, SearchQuery::new("کتاب"));
    }

    #[test]
    fn inverted_and_negative_price_ranges_pass_through() {
        let query = SearchQuery::from_arguments(&json!({
            "query": "laptop",
            "minPrice": 9000000,
            "maxPrice": -1
        }))
        .expect("cross-field ranges are not validated");

        assert_eq!(query.min_price, Some(9_000_000));
        assert_eq!(query.max_price, Some(-1));
    }

    #[test]
    fn missing_or_blank_query_is_rejected() {
        assert_eq!(
            SearchQuery::from_arguments(&json!({ "maxPrice": 10 })),
            Err(SchemaError::MissingField("query"))
        );
        assert_eq!(
            SearchQuery::from_arguments(&json!({ "query": "   " })),
            Err(SchemaError::EmptyQuery)
        );
        assert_eq!(
            SearchQuery::from_arguments(&json!({ "query": 42 })),
            Err(SchemaError::InvalidType { field: "query", expected: "a string" })
        );
        assert_eq!(SearchQuery::from_arguments(&json!(["query"])), Err(SchemaError::NotAnObject));
    }

    #[test]
    fn out_of_domain_values_are_rejected() {
        assert_eq!(
            SearchQuery::from_arguments(&json!({ "query": "x", "minRating": 7 })),
            Err(SchemaError::OutOfRange { field: "minRating", value: 7 })
        );
        assert_eq!(
            SearchQuery::from_arguments(&json!({ "query": "x", "freeShipping": 2 })),
            Err(SchemaError::OutOfRange { field: "freeShipping", value: 2 })
        );
        assert_eq!(
            SearchQuery::from_arguments(&json!({ "query": "x", "maxPrice": "cheap" })),
            Err(SchemaError::InvalidType { field: "maxPrice", expected: "an integer" })
        );
    }

    #[test]
    fn schema_requires_only_the_query() {
        let schema = search_arguments_schema();
        assert_eq!(schema["required"], json!(["query"]));
        assert_eq!(schema["properties"]["minRating"]["default"], json!(4));
        assert_eq!(schema["properties"]["freeShipping"]["enum"], json!([0, 1]));
    }
}
