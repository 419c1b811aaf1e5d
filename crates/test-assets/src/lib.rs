// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use curate_query::RawRecord;
use serde_json::{json, Value};

pub const SUBGRAPH_PATH: &str = "/subgraphs/id/2mi5zidQdekNdS6ojDj4tnKZe9MiKcseWQGAguTwcvBV";

pub const ADDRESS_TAGS_REGISTRY: &str = "0x66260c69d03837016d88c9877e61e08ef74c59f2";
pub const TOKENS_REGISTRY: &str = "0x70533554fe5c17caf77fe530f77eab933b92af60";

pub const QUERY_AUTH_TOKEN: &str = "superdupersecrettoken";

/// `count` Gnosis chain records numbered from `start`, in subgraph order.
pub fn raw_records(start: usize, count: usize) -> Vec<RawRecord> {
    (start..start + count)
        .map(|i| RawRecord {
            key0: Some(format!("eip155:100:0x{i:040x}")),
            key1: Some(format!("Contract {i}")),
            key2: Some(format!("Project {i}")),
            key3: Some(format!("https://example.org/{i}")),
        })
        .collect()
}

/// One record for each `key0` shape the exporter has to cope with.
pub fn mixed_records() -> Vec<RawRecord> {
    vec![
        RawRecord {
            key0: Some("solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp:7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU".to_string()),
            key1: Some("Jupiter".to_string()),
            key2: Some("Jupiter Aggregator".to_string()),
            key3: None,
        },
        RawRecord {
            key0: None,
            key1: Some("Orphan".to_string()),
            key2: None,
            key3: None,
        },
        RawRecord {
            key0: Some("eip155:bad".to_string()),
            key1: Some("Broken".to_string()),
            key2: Some("Broken, with comma".to_string()),
            key3: None,
        },
    ]
}

/// Subgraph response body carrying `records` as the `litems` list.
pub fn page_body(records: &[RawRecord]) -> Value {
    json!({ "data": { "litems": records } })
}

pub fn litems_page_body(start: usize, count: usize) -> Value {
    page_body(&raw_records(start, count))
}
