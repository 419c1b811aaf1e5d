// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

mod subgraph_client;

pub use subgraph_client::{DeploymentDetails, SubgraphClient, SubgraphError};

use curate_config::SubgraphConfig;

/// HTTP client shared by every page request of a run.
pub fn build_http_client(config: &SubgraphConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .tcp_nodelay(true)
        .timeout(config.request_timeout_secs)
        .build()
}

pub fn create_subgraph_client(
    http_client: reqwest::Client,
    subgraph_config: &SubgraphConfig,
) -> SubgraphClient {
    SubgraphClient::new(
        http_client,
        DeploymentDetails::for_query_url_with_token(
            subgraph_config.query_url.clone(),
            subgraph_config.query_auth_token.clone(),
        ),
    )
}
