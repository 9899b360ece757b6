//! KnowledgeIngestor trait definition.
//!
//! The ingestion/query collaborator is an external service that turns text
//! and PDFs into queryable knowledge. This core only knows its call/response
//! contract. The HTTP implementation lives in botforge-infra.

use botforge_types::error::IngestionError;
use botforge_types::knowledge::{Answer, IngestReceipt, PdfUpload};

/// Client for the knowledge ingestion/query collaborator.
///
/// Calls are not cancellable from this side; each one runs to completion or
/// failure as the transport decides.
pub trait KnowledgeIngestor: Send + Sync {
    /// Ingest free text (request field `content`).
    fn ingest_text(
        &self,
        content: &str,
    ) -> impl std::future::Future<Output = Result<IngestReceipt, IngestionError>> + Send;

    /// Ingest a PDF document (request field `file`).
    fn ingest_pdf(
        &self,
        file: &PdfUpload,
    ) -> impl std::future::Future<Output = Result<IngestReceipt, IngestionError>> + Send;

    /// Ask a question against ingested knowledge (request field `question`).
    fn ask(
        &self,
        question: &str,
    ) -> impl std::future::Future<Output = Result<Answer, IngestionError>> + Send;
}
