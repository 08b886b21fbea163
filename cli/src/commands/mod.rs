//! CLI Commands

pub mod alerts;
pub mod config;
pub mod pcap;
pub mod sensors;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use rampart_triage::pcap::{PcapJob, PcapRequest};
use rampart_triage::sensor::SensorParserConfig;
use rampart_triage::{
    Alert, AlertStatus, ColumnMetadata, SearchProvider, SearchRequest, SearchResponse,
    TriageError, TriageResult,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// REST client for the triage backend. The backend is a black box accepting
/// a query and returning a result set; this client only shapes requests and
/// forwards the bearer credential.
pub struct ApiClient {
    pub base_url: String,
    pub api_key: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(String::from),
            client: reqwest::Client::new(),
        }
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {}", key)),
            None => req,
        }
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("API returned {}: {}", status, body));
        }
        resp.json().await.context("decoding API response")
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.authorize(self.client.get(&url)).send().await?;
        Self::decode(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.authorize(self.client.post(&url).json(body)).send().await?;
        Self::decode(resp).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<()> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.authorize(self.client.delete(&url)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("API returned {}: {}", status, body));
        }
        Ok(())
    }

    // ---- triage endpoints ----

    pub async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse> {
        self.post("/search", request).await
    }

    pub async fn get_alert(&self, id: &str) -> anyhow::Result<Alert> {
        self.get(&format!("/alerts/{}", id)).await
    }

    pub async fn update_status(&self, ids: &[String], status: AlertStatus) -> anyhow::Result<()> {
        #[derive(serde::Serialize)]
        struct StatusUpdate<'a> {
            ids: &'a [String],
            status: AlertStatus,
        }
        let _: serde_json::Value = self
            .post("/update/status", &StatusUpdate { ids, status })
            .await?;
        Ok(())
    }

    pub async fn column_metadata(&self, indices: &[String]) -> anyhow::Result<Vec<ColumnMetadata>> {
        self.post("/search/column/metadata", &indices).await
    }

    pub async fn submit_pcap(&self, request: &PcapRequest) -> anyhow::Result<PcapJob> {
        self.post("/pcap/query", request).await
    }

    pub async fn pcap_status(&self, job_id: &str) -> anyhow::Result<PcapJob> {
        self.get(&format!("/pcap/{}", job_id)).await
    }

    pub async fn sensor_configs(&self) -> anyhow::Result<HashMap<String, SensorParserConfig>> {
        self.get("/sensor/parser/config").await
    }

    pub async fn sensor_config(&self, name: &str) -> anyhow::Result<SensorParserConfig> {
        self.get(&format!("/sensor/parser/config/{}", name)).await
    }

    pub async fn save_sensor_config(
        &self,
        name: &str,
        config: &SensorParserConfig,
    ) -> anyhow::Result<SensorParserConfig> {
        self.post(&format!("/sensor/parser/config/{}", name), config).await
    }

    pub async fn delete_sensor_config(&self, name: &str) -> anyhow::Result<()> {
        self.delete(&format!("/sensor/parser/config/{}", name)).await
    }
}

#[async_trait]
impl SearchProvider for ApiClient {
    async fn search(&self, request: &SearchRequest) -> TriageResult<SearchResponse> {
        ApiClient::search(self, request)
            .await
            .map_err(|e| TriageError::SearchFailed(format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_triage::QueryBuilder;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_response() -> serde_json::Value {
        serde_json::json!({
            "total": 1,
            "results": [{
                "id": "a7f3",
                "timestamp": "2026-08-30T10:00:00Z",
                "source_type": "bro",
                "ip_src_addr": "10.0.0.1",
                "status": "NEW",
                "details": {}
            }]
        })
    }

    #[tokio::test]
    async fn search_posts_query_with_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("Authorization", "Bearer secret"))
            .and(body_partial_json(serde_json::json!({ "query": "*" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("secret"));
        let response = client
            .search(&QueryBuilder::new().search_request())
            .await
            .unwrap();

        assert_eq!(response.total, 1);
        assert_eq!(response.results[0].id, "a7f3");
        assert_eq!(response.results[0].status, AlertStatus::New);
    }

    #[tokio::test]
    async fn backend_error_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("index offline"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), None);
        let err = client
            .search(&QueryBuilder::new().search_request())
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("503"));
        assert!(message.contains("index offline"));
    }

    #[tokio::test]
    async fn search_provider_maps_failures_to_triage_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), None);
        let provider: &dyn SearchProvider = &client;
        let err = provider
            .search(&QueryBuilder::new().search_request())
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::SearchFailed(_)));
    }
}
