//! Text-then-PDF ingestion saga.
//!
//! Steps run strictly in order: the PDF call is not issued until the text
//! call has fully completed. The first failure stops the run and is recorded
//! in [`KnowledgeSync`]; later steps stay `Pending`. Running the saga again
//! resumes from the first unsettled step without repeating completed ones.
//! Completed ingestion is never rolled back.

use botforge_types::error::IngestionError;
use botforge_types::knowledge::{IngestReceipt, KnowledgeSync, KnowledgeUpdate, StepStatus};

use super::ingestor::KnowledgeIngestor;

/// A planned or partially executed knowledge sync.
#[derive(Debug, Clone)]
pub struct KnowledgeSaga {
    update: KnowledgeUpdate,
    status: KnowledgeSync,
}

impl KnowledgeSaga {
    /// Plan a run for `update`. Blank text counts as not supplied.
    pub fn new(update: KnowledgeUpdate) -> Self {
        let update = update.normalized();
        let status = KnowledgeSync::planned(update.text.is_some(), update.pdf_file.is_some());
        Self { update, status }
    }

    pub fn status(&self) -> &KnowledgeSync {
        &self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    /// Run every unsettled step in order, stopping at the first failure.
    pub async fn run<I: KnowledgeIngestor>(&mut self, ingestor: &I) -> Result<(), IngestionError> {
        if let Some(text) = self.update.text.as_deref() {
            if !self.status.text.is_settled() {
                let result = ingestor.ingest_text(text).await;
                settle(&mut self.status.text, result, "text")?;
            }
        }

        if let Some(file) = self.update.pdf_file.as_ref() {
            if !self.status.pdf.is_settled() {
                let result = ingestor.ingest_pdf(file).await;
                settle(&mut self.status.pdf, result, "pdf")?;
            }
        }

        Ok(())
    }
}

/// Record the outcome of one step, passing a failure through.
fn settle(
    slot: &mut StepStatus,
    result: Result<IngestReceipt, IngestionError>,
    step: &str,
) -> Result<(), IngestionError> {
    match result {
        Ok(receipt) => {
            tracing::info!(step, stored_sentences = receipt.stored_sentences, "knowledge ingested");
            *slot = StepStatus::Completed {
                stored_sentences: receipt.stored_sentences,
            };
            Ok(())
        }
        Err(err) => {
            tracing::warn!(step, error = %err, "knowledge ingestion failed");
            *slot = StepStatus::Failed {
                detail: err.to_string(),
            };
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedIngestor;
    use botforge_types::knowledge::PdfUpload;

    fn both() -> KnowledgeUpdate {
        KnowledgeUpdate {
            text: Some("Acme sells looms. Acme ships worldwide.".to_string()),
            pdf_file: Some(PdfUpload::new("catalog.pdf", b"%PDF-1.4".to_vec())),
        }
    }

    #[tokio::test]
    async fn test_text_is_ingested_before_pdf() {
        let ingestor = ScriptedIngestor::default();
        let mut saga = KnowledgeSaga::new(both());
        saga.run(&ingestor).await.unwrap();

        let calls = ingestor.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].starts_with("text:"));
        assert_eq!(calls[1], "pdf:catalog.pdf");
        assert!(saga.is_complete());
        assert_eq!(
            saga.status().text,
            StepStatus::Completed { stored_sentences: 2 }
        );
    }

    #[tokio::test]
    async fn test_text_failure_stops_before_pdf() {
        let ingestor =
            ScriptedIngestor::failing_text(IngestionError::rejected(500, Some("db locked".into())));
        let mut saga = KnowledgeSaga::new(both());

        let err = saga.run(&ingestor).await.unwrap_err();
        assert_eq!(err.to_string(), "db locked");
        assert_eq!(ingestor.calls().len(), 1);
        assert_eq!(
            saga.status().text,
            StepStatus::Failed {
                detail: "db locked".to_string()
            }
        );
        assert_eq!(saga.status().pdf, StepStatus::Pending);
    }

    #[tokio::test]
    async fn test_resume_skips_completed_steps() {
        let ingestor = ScriptedIngestor::failing_pdf(IngestionError::Transport("refused".into()));
        let mut saga = KnowledgeSaga::new(both());

        assert!(saga.run(&ingestor).await.is_err());
        assert!(saga.status().is_partial());

        ingestor.heal();
        saga.run(&ingestor).await.unwrap();
        assert!(saga.is_complete());

        let calls = ingestor.calls();
        let text_calls = calls.iter().filter(|c| c.starts_with("text:")).count();
        assert_eq!(text_calls, 1, "completed text step must not be re-sent");
        assert_eq!(calls.iter().filter(|c| c.starts_with("pdf:")).count(), 2);
    }

    #[tokio::test]
    async fn test_blank_text_is_skipped() {
        let ingestor = ScriptedIngestor::default();
        let mut saga = KnowledgeSaga::new(KnowledgeUpdate {
            text: Some("   ".to_string()),
            pdf_file: None,
        });
        assert_eq!(saga.status().text, StepStatus::Skipped);
        saga.run(&ingestor).await.unwrap();
        assert!(ingestor.calls().is_empty());
    }
}
