//! Knowledge ingestion types: uploads, collaborator payloads, and the
//! per-step status of a two-step ingestion run.

use serde::{Deserialize, Serialize};

use std::fmt;

/// A PDF document destined for the ingestion collaborator.
#[derive(Clone)]
pub struct PdfUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PdfUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Whether the file name carries a `.pdf` extension (case-insensitive).
    pub fn has_pdf_extension(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".pdf")
    }
}

impl fmt::Debug for PdfUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// New knowledge for an existing bot. At least one field must be present.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeUpdate {
    pub text: Option<String>,
    pub pdf_file: Option<PdfUpload>,
}

impl KnowledgeUpdate {
    /// Drop whitespace-only text so it counts as "not supplied".
    pub fn normalized(mut self) -> Self {
        if self.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
            self.text = None;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.pdf_file.is_none()
    }
}

/// Success payload of a text or PDF ingestion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReceipt {
    pub status: String,
    #[serde(default)]
    pub stored_sentences: u64,
}

/// Success payload of a query call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Outcome of one step of an ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StepStatus {
    /// Supplied but not attempted yet (or not reached because an earlier step failed).
    Pending,
    /// Nothing supplied for this step.
    Skipped,
    Completed { stored_sentences: u64 },
    Failed { detail: String },
}

impl StepStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, StepStatus::Completed { .. } | StepStatus::Skipped)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "pending"),
            StepStatus::Skipped => write!(f, "skipped"),
            StepStatus::Completed { stored_sentences } => {
                write!(f, "completed ({stored_sentences} sentences)")
            }
            StepStatus::Failed { detail } => write!(f, "failed: {detail}"),
        }
    }
}

/// Recorded status of a text-then-PDF ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSync {
    pub text: StepStatus,
    pub pdf: StepStatus,
}

impl KnowledgeSync {
    /// Initial status for the given inputs.
    pub fn planned(has_text: bool, has_pdf: bool) -> Self {
        let plan = |present: bool| {
            if present {
                StepStatus::Pending
            } else {
                StepStatus::Skipped
            }
        };
        Self {
            text: plan(has_text),
            pdf: plan(has_pdf),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.text.is_settled() && self.pdf.is_settled()
    }

    /// At least one step completed while another did not.
    pub fn is_partial(&self) -> bool {
        let done = |s: &StepStatus| matches!(s, StepStatus::Completed { .. });
        (done(&self.text) || done(&self.pdf)) && !self.is_complete()
    }
}
