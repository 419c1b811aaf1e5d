// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use curate_config::TargetConfig;
use curate_record::NormalizedRecord;
use curate_subgraph::{FetchStatus, PageSource, Paginator};

use crate::{error::ExportError, sink::RecordSink};

/// What happened to a single target during an export run.
#[derive(Debug)]
pub struct TargetReport {
    pub name: String,
    pub registry_address: String,
    /// Rows handed to the sink
    pub records: usize,
    pub pages: u32,
    pub status: FetchStatus,
}

impl TargetReport {
    pub fn is_complete(&self) -> bool {
        matches!(self.status, FetchStatus::Complete)
    }
}

/// Fetches, normalizes and writes one target.
///
/// A fetch that did not complete still writes the rows it got; only a sink
/// failure is an error.
pub async fn export_target<S, K>(
    paginator: &Paginator<'_, S>,
    target: &TargetConfig,
    sink: &mut K,
) -> Result<TargetReport, ExportError>
where
    S: PageSource,
    K: RecordSink + ?Sized,
{
    tracing::info!(
        target_name = %target.name,
        registry_address = %target.registry_address,
        "Fetching target"
    );

    let outcome = paginator.fetch_all(&target.registry_address).await;
    let records: Vec<NormalizedRecord> = outcome
        .records
        .into_iter()
        .map(NormalizedRecord::from)
        .collect();

    sink.write(&target.name, &records)
        .map_err(|source| ExportError::Sink {
            target: target.name.clone(),
            source,
        })?;

    Ok(TargetReport {
        name: target.name.clone(),
        registry_address: target.registry_address.clone(),
        records: records.len(),
        pages: outcome.pages,
        status: outcome.status,
    })
}

/// Exports every target in order. Stops at the first sink failure.
pub async fn export_targets<S, K>(
    paginator: &Paginator<'_, S>,
    targets: &[&TargetConfig],
    sink: &mut K,
) -> Result<Vec<TargetReport>, ExportError>
where
    S: PageSource,
    K: RecordSink + ?Sized,
{
    let mut reports = Vec::with_capacity(targets.len());
    for target in targets {
        reports.push(export_target(paginator, target, sink).await?);
    }
    Ok(reports)
}

pub fn log_summary(reports: &[TargetReport]) {
    for report in reports {
        if report.is_complete() {
            tracing::info!(
                target_name = %report.name,
                records = report.records,
                pages = report.pages,
                "Target exported"
            );
        } else {
            tracing::warn!(
                target_name = %report.name,
                records = report.records,
                pages = report.pages,
                status = %report.status,
                "Target exported with an incomplete fetch"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use curate_config::PaginationConfig;
    use curate_subgraph::{DeploymentDetails, SubgraphClient};
    use reqwest::Url;
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, method},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::{error::SinkError, sink::MemorySink};

    const PAGINATION: PaginationConfig = PaginationConfig {
        page_size: 1000,
        max_pages: None,
    };

    fn target(name: &str, registry_address: &str) -> TargetConfig {
        TargetConfig {
            name: name.to_string(),
            registry_address: registry_address.to_string(),
        }
    }

    fn subgraph_client(mock_server: &MockServer) -> SubgraphClient {
        SubgraphClient::new(
            reqwest::Client::new(),
            DeploymentDetails::for_query_url_with_token(
                Url::parse(&mock_server.uri()).unwrap(),
                None,
            ),
        )
    }

    async fn mount_registry(
        mock_server: &MockServer,
        registry_address: &str,
        status: u16,
        body: serde_json::Value,
    ) {
        mock_server
            .register(
                Mock::given(method("POST"))
                    .and(body_partial_json(json!({
                        "variables": { "registryAddress": registry_address }
                    })))
                    .respond_with(ResponseTemplate::new(status).set_body_json(body)),
            )
            .await;
    }

    struct FailingSink;

    impl RecordSink for FailingSink {
        fn write(&mut self, _name: &str, _records: &[NormalizedRecord]) -> Result<(), SinkError> {
            Err(SinkError::Csv {
                path: "atr.csv".into(),
                source: std::io::Error::other("disk full").into(),
            })
        }
    }

    #[tokio::test]
    async fn test_export_normalizes_in_order() {
        let mock_server = MockServer::start().await;
        mount_registry(
            &mock_server,
            test_assets::ADDRESS_TAGS_REGISTRY,
            200,
            test_assets::page_body(&test_assets::mixed_records()),
        )
        .await;

        let client = subgraph_client(&mock_server);
        let paginator = Paginator::new(&client, &PAGINATION, vec!["Registered".to_string()]);
        let mut sink = MemorySink::default();

        let report = export_target(
            &paginator,
            &target("atr", test_assets::ADDRESS_TAGS_REGISTRY),
            &mut sink,
        )
        .await
        .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.records, 3);
        assert_eq!(report.pages, 1);

        let expected: Vec<_> = test_assets::mixed_records()
            .into_iter()
            .map(NormalizedRecord::from)
            .collect();
        assert_eq!(sink.get("atr"), Some(expected.as_slice()));
        assert_eq!(expected[0].chain_id.as_deref(), Some("solana"));
    }

    #[test_log::test(tokio::test)]
    async fn test_failed_target_does_not_stop_the_run() {
        let mock_server = MockServer::start().await;
        mount_registry(
            &mock_server,
            test_assets::ADDRESS_TAGS_REGISTRY,
            500,
            json!({ "message": "overloaded" }),
        )
        .await;
        mount_registry(
            &mock_server,
            test_assets::TOKENS_REGISTRY,
            200,
            test_assets::litems_page_body(0, 2),
        )
        .await;

        let client = subgraph_client(&mock_server);
        let paginator = Paginator::new(&client, &PAGINATION, vec!["Registered".to_string()]);
        let atr = target("atr", test_assets::ADDRESS_TAGS_REGISTRY);
        let token = target("token", test_assets::TOKENS_REGISTRY);
        let mut sink = MemorySink::default();

        let reports = export_targets(&paginator, &[&atr, &token], &mut sink)
            .await
            .unwrap();
        log_summary(&reports);

        assert_eq!(reports.len(), 2);
        assert!(!reports[0].is_complete());
        assert_eq!(reports[0].records, 0);
        assert!(reports[1].is_complete());
        assert_eq!(reports[1].records, 2);

        // The failed target still gets an (empty) write
        assert_eq!(sink.names(), vec!["atr", "token"]);
        assert_eq!(sink.get("atr"), Some(&[][..]));
    }

    #[tokio::test]
    async fn test_sink_failure_is_an_error() {
        let mock_server = MockServer::start().await;
        mount_registry(
            &mock_server,
            test_assets::ADDRESS_TAGS_REGISTRY,
            200,
            test_assets::litems_page_body(0, 1),
        )
        .await;

        let client = subgraph_client(&mock_server);
        let paginator = Paginator::new(&client, &PAGINATION, vec!["Registered".to_string()]);

        let err = export_target(
            &paginator,
            &target("atr", test_assets::ADDRESS_TAGS_REGISTRY),
            &mut FailingSink,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ExportError::Sink { ref target, .. } if target == "atr"));
    }
}
