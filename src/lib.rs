pub mod ast;
pub mod config;
pub mod convert;
pub mod database;
pub mod error;
pub mod export;
pub mod importer;
pub mod json;
pub mod lexer;
pub mod lint;
pub mod logger;
pub mod model;
pub mod parser;
pub mod reader;
pub mod source;
pub mod validate;

use wasm_bindgen::prelude::*;

pub use config::ImportConfig;
pub use error::JdlError;
pub use importer::{ImportState, JdlImporter};

use database::DatabaseType;
use export::NoDiskState;
use logger::RecordingLogger;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Convert JDL source to the JSON of its entities, keyed by entity name
#[wasm_bindgen(js_name = "jdlToJson")]
pub fn jdl_to_json(source: &str, database_type: Option<String>) -> Result<String, String> {
    let database = match database_type.as_deref() {
        Some(name) => DatabaseType::from_str(name)
            .ok_or_else(|| format!("Unknown database type '{}'", name))?,
        None => DatabaseType::Sql,
    };
    let config = ImportConfig::default()
        .with_database_type(database)
        .with_json_only(true);

    let logger = RecordingLogger::new();
    let importer = JdlImporter::new(config, &logger);
    let document = reader::parse_content(source).map_err(|e| e.to_string())?;
    let object = convert::convert(&document, importer.config(), &logger);
    let import = importer
        .import_object(&object, &NoDiskState)
        .map_err(|e| e.to_string())?;

    serde_json::to_string_pretty(&import.entities).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_jdl_to_json() {
        let json = jdl_to_json("entity A { name String }", None).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["A"]["fields"][0]["fieldName"], "name");
    }

    #[test]
    fn test_jdl_to_json_errors() {
        assert!(jdl_to_json("entity A", Some("oracle".into())).is_err());
        let err = jdl_to_json(
            "entity A\nentity B\nrelationship OneToOne { A to B }",
            Some("mongodb".into()),
        )
        .unwrap_err();
        assert!(err.contains("NoSQL"));
        assert!(jdl_to_json("enity A", None).is_err());
    }
}
