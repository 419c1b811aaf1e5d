// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

//! GraphQL documents and wire types for the curated-list subgraph.

pub mod litems_query {
    use graphql_client::{GraphQLQuery, QueryBody};
    use serde::{Deserialize, Serialize};

    pub const QUERY: &str = include_str!("../graphql/litems.query.graphql");
    pub const OPERATION_NAME: &str = "Litems";

    /// Pages through the `litems` list of a single registry.
    pub struct LitemsQuery;

    #[derive(Serialize, Debug, Clone, PartialEq, Eq)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub registry_address: String,
        pub statuses: Vec<String>,
        pub first: i64,
        pub skip: i64,
    }

    #[derive(Deserialize, Debug, Default)]
    pub struct ResponseData {
        /// Absent or `null` when the subgraph has nothing to return
        #[serde(default)]
        pub litems: Option<Vec<RawRecord>>,
    }

    impl ResponseData {
        pub fn into_records(self) -> Vec<RawRecord> {
            self.litems.unwrap_or_default()
        }
    }

    /// One list item as returned by the subgraph. Every key may be null.
    #[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
    #[serde(default)]
    pub struct RawRecord {
        pub key0: Option<String>,
        pub key1: Option<String>,
        pub key2: Option<String>,
        pub key3: Option<String>,
    }

    impl GraphQLQuery for LitemsQuery {
        type Variables = Variables;
        type ResponseData = ResponseData;

        fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
            QueryBody {
                variables,
                query: QUERY,
                operation_name: OPERATION_NAME,
            }
        }
    }
}

pub use litems_query::{LitemsQuery, RawRecord};

/// Position of one page within a paginated `litems` fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub registry_address: String,
    pub statuses: Vec<String>,
    pub page_size: u32,
    /// Always a multiple of `page_size`
    pub offset: u64,
}

impl PageRequest {
    pub fn first(registry_address: impl Into<String>, statuses: Vec<String>, page_size: u32) -> Self {
        Self {
            registry_address: registry_address.into(),
            statuses,
            page_size,
            offset: 0,
        }
    }

    pub fn advance(&mut self) {
        self.offset += u64::from(self.page_size);
    }
}

impl From<&PageRequest> for litems_query::Variables {
    fn from(request: &PageRequest) -> Self {
        Self {
            registry_address: request.registry_address.clone(),
            statuses: request.statuses.clone(),
            first: i64::from(request.page_size),
            skip: request.offset as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use graphql_client::GraphQLQuery;
    use serde_json::json;

    use super::*;
    use crate::litems_query::ResponseData;

    #[test]
    fn request_body_carries_page_variables() {
        let mut request = PageRequest::first(
            "0xREG",
            vec!["Registered".to_string(), "RegistrationRequested".to_string()],
            1000,
        );
        request.advance();
        request.advance();

        let body = LitemsQuery::build_query((&request).into());
        let body = serde_json::to_value(body).unwrap();

        assert_eq!(body["operationName"], "Litems");
        assert_eq!(
            body["variables"],
            json!({
                "registryAddress": "0xREG",
                "statuses": ["Registered", "RegistrationRequested"],
                "first": 1000,
                "skip": 2000,
            })
        );
        assert!(body["query"].as_str().unwrap().contains("litems("));
    }

    #[test]
    fn missing_keys_deserialize_as_null() {
        let record: RawRecord = serde_json::from_value(json!({ "key1": "a" })).unwrap();

        assert_eq!(
            record,
            RawRecord {
                key1: Some("a".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn missing_or_null_list_is_empty() {
        let data: ResponseData = serde_json::from_value(json!({})).unwrap();
        assert!(data.into_records().is_empty());

        let data: ResponseData = serde_json::from_value(json!({ "litems": null })).unwrap();
        assert!(data.into_records().is_empty());
    }
}
