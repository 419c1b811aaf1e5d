// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

mod client;
mod pagination;

pub use crate::{
    client::{
        build_http_client, create_subgraph_client, DeploymentDetails, SubgraphClient,
        SubgraphError,
    },
    pagination::{FetchOutcome, FetchStatus, PageSource, Paginator},
};
