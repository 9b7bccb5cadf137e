//! Prompt template, declared response schema and reply parsing
//!
//! Two schemas describe the same shape:
//! - [`response_schema`]: the OpenAPI-subset schema sent to the content API
//!   so the model is constrained to the shape
//! - the JSON Schema derived from [`GeneratedItem`], used locally to check
//!   the reply actually conforms before it is trusted

use crate::error::GenerationError;
use duka_model::Store;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

/// One item as the model returns it, before decoration
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct GeneratedItem {
    pub name: String,
    pub price: String,
    pub description: String,
    /// Sub-category within the store
    pub category: String,
    pub tags: Vec<String>,
}

/// Catalogue prompt for a store
#[must_use]
pub fn catalogue_prompt(store: &Store) -> String {
    format!(
        "Generate a realistic catalogue of 10-12 products for a store in Nairobi, Kenya named \"{name}\" \
         which is a \"{category}\". For each product, provide a name, price (in Kenyan Shillings, \
         format as \"KSh X,XXX\"), a short description reflecting local Kenyan tastes, 2-3 relevant \
         tags, and assign it to one of 3 specific sub-categories relevant to this shop.",
        name = store.name,
        category = store.category,
    )
}

/// Response schema declared to the content API
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "price": { "type": "STRING" },
                "description": { "type": "STRING" },
                "category": { "type": "STRING", "description": "Sub-category within the store" },
                "tags": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                }
            },
            "required": ["name", "price", "description", "tags", "category"]
        }
    })
}

static REPLY_VALIDATOR: Lazy<Result<JSONSchema, String>> = Lazy::new(|| {
    let schema = serde_json::to_value(schemars::schema_for!(Vec<GeneratedItem>))
        .map_err(|e| e.to_string())?;
    let compiled = JSONSchema::compile(&schema).map_err(|e| e.to_string());
    compiled
});

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("code fence pattern is valid")
});

/// Strip a surrounding markdown code fence, if any
#[must_use]
pub fn strip_code_fence(reply: &str) -> &str {
    CODE_FENCE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map_or(reply.trim(), |m| m.as_str())
}

/// Parse and validate reply text into generated items
///
/// # Errors
/// - `GenerationError::Parse` if the text is not JSON
/// - `GenerationError::SchemaMismatch` if it is not an array of items
/// - `GenerationError::Schema` if the local schema failed to compile
pub fn parse_reply(reply: &str) -> Result<Vec<GeneratedItem>, GenerationError> {
    let value: Value = serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| GenerationError::Parse(e.to_string()))?;

    let validator = REPLY_VALIDATOR
        .as_ref()
        .map_err(|e| GenerationError::Schema(e.clone()))?;

    if let Err(errors) = validator.validate(&value) {
        let message = errors
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(GenerationError::SchemaMismatch(message));
    }

    serde_json::from_value(value).map_err(|e| GenerationError::SchemaMismatch(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use duka_model::{BuildingId, StoreId};

    fn artcaffe() -> Store {
        Store {
            id: StoreId::from("s2"),
            building_id: BuildingId::from("b1"),
            name: "Artcaffe".to_string(),
            category: "Restaurant".to_string(),
            floor: 0,
            description: String::new(),
            rating: 4.7,
            image: String::new(),
        }
    }

    #[test]
    fn prompt_embeds_store() {
        let prompt = catalogue_prompt(&artcaffe());
        assert!(prompt.contains("named \"Artcaffe\""));
        assert!(prompt.contains("which is a \"Restaurant\""));
        assert!(prompt.contains("10-12 products"));
        assert!(prompt.contains("KSh X,XXX"));
    }

    #[test]
    fn declared_schema_requires_all_fields() {
        let schema = response_schema();
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 5);
        assert_eq!(schema["type"], "ARRAY");
    }

    #[test]
    fn parses_valid_reply() {
        let reply = r#"[{"name":"Latte","price":"KSh 350","description":"Smooth","category":"Coffee","tags":["hot"]}]"#;
        let items = parse_reply(reply).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "Coffee");
    }

    #[test]
    fn parses_fenced_reply() {
        let reply = "```json\n[{\"name\":\"Latte\",\"price\":\"KSh 350\",\"description\":\"d\",\"category\":\"Coffee\",\"tags\":[]}]\n```";
        assert_eq!(parse_reply(reply).unwrap().len(), 1);
    }

    #[test]
    fn empty_array_is_a_valid_catalogue() {
        assert!(parse_reply("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(parse_reply("Sorry, I can't"), Err(GenerationError::Parse(_))));
    }

    #[test]
    fn rejects_missing_field() {
        let reply = r#"[{"name":"Latte","price":"KSh 350","description":"d","tags":[]}]"#;
        assert!(matches!(parse_reply(reply), Err(GenerationError::SchemaMismatch(_))));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(matches!(
            parse_reply(r#"{"items": []}"#),
            Err(GenerationError::SchemaMismatch(_))
        ));
        assert!(matches!(
            parse_reply(r#"[{"name":"x","price":2500,"description":"d","category":"c","tags":[]}]"#),
            Err(GenerationError::SchemaMismatch(_))
        ));
    }
}
