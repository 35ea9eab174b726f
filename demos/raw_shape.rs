//! Building a nested raw shape and rendering it as JSON.
//!
//! Run with: cargo run --example raw_shape

use serde_shape::{build_raw_shape, flatten, tree, EncodingOptions};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let tree = tree!({
        "tableName": "orders",
        "keys": [{ "id": 1 }, { "id": 2 }],
        "consistentRead": true
    });

    // Nested formats keep structure and original key spelling
    let shape = build_raw_shape(&tree)?;
    println!("JSON:\n{}\n", serde_json::to_string_pretty(&shape)?);

    // The same tree flattened for a form body
    let entries = flatten(&tree, &EncodingOptions::ec2_query())?;
    println!("Flat:");
    for entry in entries {
        println!("  {} = {}", entry.key, entry.value.unwrap_or_default());
    }

    Ok(())
}
