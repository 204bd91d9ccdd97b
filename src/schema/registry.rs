//! Embedded JSON Schema registry
//!
//! Record schemas ship inside the binary so that `mingle validate` works
//! without any setup.

use rust_embed::RustEmbed;

use crate::core::identity::RecordPrefix;

#[derive(RustEmbed)]
#[folder = "schemas/"]
struct SchemaAssets;

/// Registry of JSON Schemas by record prefix
#[derive(Debug, Default)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// Get the schema source for a record prefix
    pub fn get(&self, prefix: RecordPrefix) -> Option<String> {
        let filename = format!("{}.schema.json", prefix.as_str().to_lowercase());
        let file = SchemaAssets::get(&filename)?;
        String::from_utf8(file.data.into_owned()).ok()
    }

    /// Whether a schema exists for the given prefix
    pub fn has_schema(&self, prefix: RecordPrefix) -> bool {
        self.get(prefix).is_some()
    }
}
