//! In-memory fakes for the core's ports, shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use botforge_types::error::{CredentialError, IngestionError, RepositoryError};
use botforge_types::knowledge::{Answer, IngestReceipt, PdfUpload};

use crate::knowledge::ingestor::KnowledgeIngestor;
use crate::service::credential::CredentialHasher;
use crate::storage::durable::DurableStore;

/// Durable store backed by a shared map. Clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryDurableStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryDurableStore {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

impl DurableStore for MemoryDurableStore {
    async fn read(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.raw(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.put_raw(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Salted, non-invertible-looking stand-in for the Argon2 hasher.
///
/// Digest format: `fake$<salt>$<reversed secret>`. Anything else fails closed.
#[derive(Default)]
pub struct FakeHasher {
    salt: AtomicU64,
}

impl CredentialHasher for FakeHasher {
    fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        let salt = self.salt.fetch_add(1, Ordering::Relaxed);
        Ok(format!("fake${salt}${}", secret.chars().rev().collect::<String>()))
    }

    fn verify(&self, secret: &str, digest: &str) -> bool {
        let mut parts = digest.splitn(3, '$');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("fake"), Some(salt), Some(body)) if salt.parse::<u64>().is_ok() => {
                body == secret.chars().rev().collect::<String>()
            }
            _ => false,
        }
    }
}

/// Ingestor that records every call and fails on demand.
#[derive(Clone, Default)]
pub struct ScriptedIngestor {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_text: Arc<Mutex<Option<IngestionError>>>,
    pub fail_pdf: Arc<Mutex<Option<IngestionError>>>,
}

impl ScriptedIngestor {
    pub fn failing_text(err: IngestionError) -> Self {
        let ingestor = Self::default();
        *ingestor.fail_text.lock().unwrap() = Some(err);
        ingestor
    }

    pub fn failing_pdf(err: IngestionError) -> Self {
        let ingestor = Self::default();
        *ingestor.fail_pdf.lock().unwrap() = Some(err);
        ingestor
    }

    pub fn heal(&self) {
        *self.fail_text.lock().unwrap() = None;
        *self.fail_pdf.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl KnowledgeIngestor for ScriptedIngestor {
    async fn ingest_text(&self, content: &str) -> Result<IngestReceipt, IngestionError> {
        self.calls.lock().unwrap().push(format!("text:{content}"));
        if let Some(err) = self.fail_text.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(IngestReceipt {
            status: "success".to_string(),
            stored_sentences: content.split('.').filter(|s| !s.trim().is_empty()).count() as u64,
        })
    }

    async fn ingest_pdf(&self, file: &PdfUpload) -> Result<IngestReceipt, IngestionError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("pdf:{}", file.file_name));
        if let Some(err) = self.fail_pdf.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(IngestReceipt {
            status: "success".to_string(),
            stored_sentences: 3,
        })
    }

    async fn ask(&self, question: &str) -> Result<Answer, IngestionError> {
        self.calls.lock().unwrap().push(format!("ask:{question}"));
        Ok(Answer {
            answer: "Information not found.".to_string(),
            confidence: 0.0,
        })
    }
}
