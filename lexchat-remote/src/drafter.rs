//! Client for the document drafting service
//!
//! Rendering happens remotely; this client only submits the field record
//! and reports where the generated PDF can be downloaded.

use lexchat_core::config::DrafterConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::base::{RemoteError, RemoteResult};
use crate::http::check_status;

/// Fields of a domicile certificate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomicileCertificateRequest {
    pub name: String,
    pub father_name: String,
    pub address: String,
    pub state: String,
    pub years_of_residence: u32,
    pub purpose: String,
    pub issue_date: String,
    pub authority: String,
}

/// Result of a successful generation request
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateReceipt {
    /// Download location, absolute once returned by the client
    pub pdf_url: String,
    /// Rendered certificate text, when the service echoes it
    #[serde(default)]
    pub certificate: Option<String>,
    #[serde(default)]
    pub certificate_id: Option<String>,
}

pub struct DraftingClient {
    client: Client,
    base_url: String,
}

impl DraftingClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> RemoteResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &DrafterConfig) -> RemoteResult<Self> {
        Self::new(config.base_url.clone(), None)
    }

    /// Submit a domicile certificate for rendering with `template_name`
    pub async fn generate_domicile_certificate(
        &self,
        template_name: &str,
        request: &DomicileCertificateRequest,
    ) -> RemoteResult<CertificateReceipt> {
        let url = format!("{}/generate_domicile_certificate/", self.base_url);
        debug!("Requesting certificate with template {}", template_name);

        let response = self
            .client
            .post(&url)
            .query(&[("template_name", template_name)])
            .json(request)
            .send()
            .await?;
        let mut receipt: CertificateReceipt = check_status(response).await?.json().await?;

        if receipt.pdf_url.trim().is_empty() {
            return Err(RemoteError::InvalidResponse(
                "service returned an empty pdf_url".to_string(),
            ));
        }
        receipt.pdf_url = self.resolve_url(&receipt.pdf_url);

        info!("Certificate generated: {}", receipt.pdf_url);
        Ok(receipt)
    }

    fn resolve_url(&self, pdf_url: &str) -> String {
        if pdf_url.starts_with("http://") || pdf_url.starts_with("https://") {
            pdf_url.to_string()
        } else {
            format!("{}/{}", self.base_url, pdf_url.trim_start_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn sample_request() -> DomicileCertificateRequest {
        DomicileCertificateRequest {
            name: "Asha Rao".to_string(),
            father_name: "Ravi Rao".to_string(),
            address: "12 MG Road, Pune".to_string(),
            state: "Maharashtra".to_string(),
            years_of_residence: 15,
            purpose: "College admission".to_string(),
            issue_date: "2026-10-16".to_string(),
            authority: "Tehsildar, Pune".to_string(),
        }
    }

    #[test]
    fn test_resolve_url() {
        let client = DraftingClient::new("http://drafter:8001/", None).unwrap();
        assert_eq!(
            client.resolve_url("/download_certificate/abc"),
            "http://drafter:8001/download_certificate/abc"
        );
        assert_eq!(
            client.resolve_url("https://cdn.example.com/a.pdf"),
            "https://cdn.example.com/a.pdf"
        );
    }

    #[tokio::test]
    async fn test_generate_certificate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate_domicile_certificate/")
            .match_query(Matcher::UrlEncoded(
                "template_name".into(),
                "domicile_certificate".into(),
            ))
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": "Asha Rao",
                "years_of_residence": 15
            })))
            .with_status(200)
            .with_body(r#"{"certificate":"...","certificate_id":"c1","pdf_url":"/download_certificate/c1"}"#)
            .create_async()
            .await;

        let client = DraftingClient::new(server.url(), None).unwrap();
        let receipt = client
            .generate_domicile_certificate("domicile_certificate", &sample_request())
            .await
            .unwrap();

        assert_eq!(
            receipt.pdf_url,
            format!("{}/download_certificate/c1", server.url())
        );
        assert_eq!(receipt.certificate_id.as_deref(), Some("c1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_certificate_error_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate_domicile_certificate/")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"detail":"Template not found"}"#)
            .create_async()
            .await;

        let client = DraftingClient::new(server.url(), None).unwrap();
        let err = client
            .generate_domicile_certificate("missing", &sample_request())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Template not found"));
    }
}
