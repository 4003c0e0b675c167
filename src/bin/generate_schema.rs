//! Generate JSON Schema for the picker configuration
//!
//! Usage:
//!   cargo run --features dev-bins --bin generate_schema > picker-config-schema.json

use schemars::schema_for;
use type_picker::config::PickerConfig;

fn main() {
    let schema = schema_for!(PickerConfig);
    let output = serde_json::to_string_pretty(&schema).expect("Failed to serialize schema");
    println!("{}", output);
}
