//! HTTP client for the knowledge ingestion/query service.
//!
//! Wire contract (all requests are `multipart/form-data` POSTs):
//!
//! | Endpoint       | Field      | Success body                                  |
//! |----------------|------------|-----------------------------------------------|
//! | `/train/text`  | `content`  | `{"status":"success","stored_sentences":N}`   |
//! | `/train/pdf`   | `file`     | `{"status":"success","stored_sentences":N}`   |
//! | `/ask`         | `question` | `{"answer":"...","confidence":0.42}`          |
//!
//! Non-2xx responses may carry `{"detail":"..."}`; that text is surfaced
//! verbatim, otherwise the error reads `Server error: <status>`. A train
//! reply whose `status` is anything but `"success"` is rejected the same way.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use botforge_core::knowledge::ingestor::KnowledgeIngestor;
use botforge_types::config::KnowledgeConfig;
use botforge_types::error::IngestionError;
use botforge_types::knowledge::{Answer, IngestReceipt, PdfUpload};

const TRAIN_SUCCESS: &str = "success";

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Raw reply of `/train/text` and `/train/pdf`.
#[derive(Deserialize)]
struct TrainReply {
    status: String,
    #[serde(default)]
    stored_sentences: u64,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl TrainReply {
    fn into_receipt(self, http_status: u16) -> Result<IngestReceipt, IngestionError> {
        if self.status != TRAIN_SUCCESS {
            tracing::warn!(status = %self.status, "knowledge service reported non-success");
            return Err(IngestionError::rejected(
                http_status,
                self.detail.and_then(detail_text),
            ));
        }
        Ok(IngestReceipt {
            status: self.status,
            stored_sentences: self.stored_sentences,
        })
    }
}

/// reqwest-backed [`KnowledgeIngestor`].
#[derive(Clone)]
pub struct HttpKnowledgeClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpKnowledgeClient {
    pub fn new(config: &KnowledgeConfig) -> Result<Self, IngestionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IngestionError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Form,
    ) -> Result<(u16, T), IngestionError> {
        let url = format!("{}{endpoint}", self.base_url);
        tracing::debug!(%url, "calling knowledge service");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| IngestionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IngestionError::rejected(status.as_u16(), error_detail(&body)));
        }

        let body = response
            .json()
            .await
            .map_err(|e| IngestionError::Decode(e.to_string()))?;
        Ok((status.as_u16(), body))
    }

    async fn train(&self, endpoint: &str, form: Form) -> Result<IngestReceipt, IngestionError> {
        let (status, reply): (u16, TrainReply) = self.post_form(endpoint, form).await?;
        reply.into_receipt(status)
    }
}

/// Pull a human-readable `detail` out of an error body, if there is one.
fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    detail_text(parsed.detail?)
}

fn detail_text(detail: serde_json::Value) -> Option<String> {
    match detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl KnowledgeIngestor for HttpKnowledgeClient {
    async fn ingest_text(&self, content: &str) -> Result<IngestReceipt, IngestionError> {
        let form = Form::new().text("content", content.to_string());
        self.train("/train/text", form).await
    }

    async fn ingest_pdf(&self, file: &PdfUpload) -> Result<IngestReceipt, IngestionError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str("application/pdf")
            .map_err(|e| IngestionError::Transport(e.to_string()))?;
        self.train("/train/pdf", Form::new().part("file", part)).await
    }

    async fn ask(&self, question: &str) -> Result<Answer, IngestionError> {
        let form = Form::new().text("question", question.to_string());
        let (_, answer) = self.post_form("/ask", form).await?;
        Ok(answer)
    }
}
