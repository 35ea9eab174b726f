//! Flattening a request into query-string pairs.
//!
//! Run with: cargo run --example query_string

use serde::Serialize;
use serde_shape::{to_flat_entries, EncodingOptions, KeyTransform};
use std::collections::BTreeMap;
use std::error::Error;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendMessage {
    queue_url: String,
    message_body: String,
    message_attributes: BTreeMap<String, String>,
    delay_seconds: Option<u32>,
}

#[derive(Serialize)]
struct DescribeInstances {
    instance_id: Vec<String>,
    max_results: u32,
}

fn print_query(entries: &[serde_shape::FlattenedEntry]) {
    let query = entries
        .iter()
        .map(|e| match &e.value {
            Some(v) => format!("{}={}", e.key, v),
            None => e.key.clone(),
        })
        .collect::<Vec<_>>()
        .join("&");
    println!("{}\n", query);
}

fn main() -> Result<(), Box<dyn Error>> {
    let send = SendMessage {
        queue_url: "https://queue.example/123/orders".to_string(),
        message_body: "hello".to_string(),
        message_attributes: [("Priority".to_string(), "high".to_string())]
            .into_iter()
            .collect(),
        delay_seconds: None,
    };

    // Tagged list members, key/value map entries
    println!("Query protocol:");
    print_query(&to_flat_entries(&send, &EncodingOptions::query())?);

    // Flat lists with capitalized member names
    let describe = DescribeInstances {
        instance_id: vec!["i-1".to_string(), "i-2".to_string()],
        max_results: 5,
    };
    let pascal = KeyTransform::custom(|k| {
        k.split('_')
            .map(|part| KeyTransform::CapitalizeFirst.apply(part))
            .collect()
    });
    println!("EC2 query protocol:");
    print_query(&to_flat_entries(
        &describe,
        &EncodingOptions::ec2_query().with_key_transform(pascal),
    )?);

    // A bare list has no key to hang its items on
    println!("Root list:");
    match to_flat_entries(&vec!["a", "b"], &EncodingOptions::default()) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("{}", e),
    }

    Ok(())
}
