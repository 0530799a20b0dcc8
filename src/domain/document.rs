use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;

use super::{ANALYSIS_SELECTOR, PACKAGE_SELECTOR};

/// Key under which a generated document is published, e.g. `resume`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentType(String);

impl DocumentType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names that download paths resolve to something other than a document.
    pub fn is_reserved(&self) -> bool {
        matches!(self.0.as_str(), "" | PACKAGE_SELECTOR | ANALYSIS_SELECTOR)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    pub filename: String,
    pub content_type: String,
    pub content: Bytes,
}

impl GeneratedDocument {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Everything a completed job produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobOutputs {
    pub documents: BTreeMap<DocumentType, GeneratedDocument>,
    pub analysis: serde_json::Value,
}

impl JobOutputs {
    pub fn document(&self, document_type: &DocumentType) -> Option<&GeneratedDocument> {
        self.documents.get(document_type)
    }

    pub fn document_types(&self) -> impl Iterator<Item = &DocumentType> {
        self.documents.keys()
    }
}
