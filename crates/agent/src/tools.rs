use bazaar_core::search_arguments_schema;
use serde_json::{json, Value};

pub const SEARCH_PRODUCTS: &str = "search_products";

/// A function tool offered to the inference step.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn search_products() -> Self {
        Self {
            name: SEARCH_PRODUCTS,
            description: "Search for products in the marketplace. Use this tool to find \
                          products like honey, mobile phones, laptops, etc.",
            parameters: search_arguments_schema(),
        }
    }

    pub fn to_openai_tool_json(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// One tool invocation requested by the inference step.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolCall {
    pub id: Option<String>,
    pub tool_name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        Self { id: None, tool_name: tool_name.into(), arguments }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ToolDefinition, SEARCH_PRODUCTS};

    #[test]
    fn search_tool_serializes_as_openai_function() {
        let tool = ToolDefinition::search_products().to_openai_tool_json();

        assert_eq!(tool["type"], json!("function"));
        assert_eq!(tool["function"]["name"], json!(SEARCH_PRODUCTS));
        assert_eq!(tool["function"]["parameters"]["required"], json!(["query"]));
        assert!(tool["function"]["parameters"]["properties"]["freeShipping"].is_object());
    }
}
