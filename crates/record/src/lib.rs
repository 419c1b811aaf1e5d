// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use curate_query::RawRecord;
use serde::Serialize;

/// Column order of every exported row.
pub const COLUMNS: [&str; 5] = ["chain_id", "address", "key1", "key2", "key3"];

const EIP155_MARKER: &str = "eip155";
const SOLANA_MARKER: &str = "solana";
const SOLANA_CHAIN_ID: &str = "solana";

/// A list item reshaped into the exported column layout.
///
/// Field order matches [`COLUMNS`], so serializing a record yields a row in
/// the expected order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub chain_id: Option<String>,
    pub address: Option<String>,
    pub key1: Option<String>,
    pub key2: Option<String>,
    pub key3: Option<String>,
}

impl From<RawRecord> for NormalizedRecord {
    fn from(record: RawRecord) -> Self {
        let (chain_id, address) = match record.key0 {
            Some(key0) => split_chain_and_address(key0),
            None => (None, None),
        };

        Self {
            chain_id,
            address,
            key1: record.key1,
            key2: record.key2,
            key3: record.key3,
        }
    }
}

pub fn normalize(record: RawRecord) -> NormalizedRecord {
    record.into()
}

/// Splits a CAIP-10 style `key0` into its chain id and address.
///
/// `eip155` takes precedence over `solana`. An `eip155` value with fewer than
/// three `:` separated parts, and any value matching neither marker, keeps
/// `key0` untouched as the address with no chain id.
pub fn split_chain_and_address(key0: String) -> (Option<String>, Option<String>) {
    if key0.contains(EIP155_MARKER) {
        let split = match key0.split(':').collect::<Vec<_>>().as_slice() {
            [_, .., chain_id, address] => Some((chain_id.to_string(), address.to_string())),
            _ => None,
        };
        return match split {
            Some((chain_id, address)) => (Some(chain_id), Some(address)),
            None => (None, Some(key0)),
        };
    }

    if key0.contains(SOLANA_MARKER) {
        let address = key0.rsplit(':').next().unwrap_or_default().to_string();
        return (Some(SOLANA_CHAIN_ID.to_string()), Some(address));
    }

    (None, Some(key0))
}
