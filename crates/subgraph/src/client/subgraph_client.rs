// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use graphql_client::GraphQLQuery;
use reqwest::{header, StatusCode, Url};
use thiserror::Error;
use tracing::warn;

const USER_AGENT: &str = "curate-export";

#[derive(Debug, Error)]
pub enum SubgraphError {
    #[error("Failed to reach subgraph: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Subgraph responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Subgraph response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct DeploymentDetails {
    query_url: Url,
    query_auth_token: Option<String>,
}

impl DeploymentDetails {
    pub fn for_query_url_with_token(query_url: Url, query_auth_token: Option<String>) -> Self {
        Self {
            query_url,
            query_auth_token,
        }
    }
}

/// Client for a single subgraph query endpoint
pub struct SubgraphClient {
    http_client: reqwest::Client,
    query_url: Url,
    query_auth_token: Option<String>,
}

impl SubgraphClient {
    pub fn new(http_client: reqwest::Client, details: DeploymentDetails) -> Self {
        Self {
            http_client,
            query_url: details.query_url,
            query_auth_token: details.query_auth_token,
        }
    }

    pub fn query_url(&self) -> &Url {
        &self.query_url
    }

    /// Posts `Q` and returns its data.
    ///
    /// A response without `data` (or with `data: null`) is the default
    /// response data rather than an error. GraphQL errors are only logged.
    pub async fn query<Q>(&self, variables: Q::Variables) -> Result<Q::ResponseData, SubgraphError>
    where
        Q: GraphQLQuery,
        Q::ResponseData: Default,
    {
        let body = Q::build_query(variables);
        let mut req = self
            .http_client
            .post(self.query_url.as_ref())
            .header(header::USER_AGENT, USER_AGENT)
            .json(&body);

        if let Some(token) = self.query_auth_token.as_ref() {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let reqwest_response = req.send().await?;
        let status = reqwest_response.status();
        if !status.is_success() {
            let body = reqwest_response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(SubgraphError::Status { status, body });
        }

        let bytes = reqwest_response.bytes().await?;
        let response: graphql_client::Response<Q::ResponseData> =
            serde_json::from_slice(&bytes).map_err(SubgraphError::Decode)?;

        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            warn!(
                query_url = %self.query_url,
                operation = body.operation_name,
                ?errors,
                "Subgraph returned GraphQL errors, treating missing data as empty"
            );
        }

        Ok(response.data.unwrap_or_default())
    }
}
