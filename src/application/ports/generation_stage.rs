use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{DocumentType, GeneratedDocument, GenerationRequest, JobId, JobOutputs};

/// Working state handed from stage to stage while a job runs. Only turned
/// into [`JobOutputs`] once every stage has succeeded.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub job_id: JobId,
    pub request: GenerationRequest,
    pub documents: BTreeMap<DocumentType, GeneratedDocument>,
    pub analysis: serde_json::Map<String, serde_json::Value>,
}

impl GenerationContext {
    pub fn new(job_id: JobId, request: GenerationRequest) -> Self {
        Self {
            job_id,
            request,
            documents: BTreeMap::new(),
            analysis: serde_json::Map::new(),
        }
    }

    /// Fails for names taken by the download selectors (`package`,
    /// `analysis`), which could never be fetched as documents.
    pub fn add_document(
        &mut self,
        document_type: DocumentType,
        document: GeneratedDocument,
    ) -> Result<(), StageError> {
        if document_type.is_reserved() {
            return Err(StageError::InvalidInput(format!(
                "document type '{}' is reserved",
                document_type
            )));
        }
        self.documents.insert(document_type, document);
        Ok(())
    }

    pub fn into_outputs(self) -> JobOutputs {
        JobOutputs {
            documents: self.documents,
            analysis: serde_json::Value::Object(self.analysis),
        }
    }
}

/// One step of the generation pipeline. The runner only cares whether a
/// stage succeeded; what it produces lands in the context.
#[async_trait]
pub trait GenerationStage: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, context: &mut GenerationContext) -> Result<(), StageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}
