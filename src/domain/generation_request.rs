use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Formal,
    Enthusiastic,
    #[serde(other)]
    Unrecognized,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Formal => "formal",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Unrecognized => "unrecognized",
        }
    }
}

/// Options recognized by the generation pipeline. Keys the service does not
/// know about are dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationPreferences {
    pub include_references: bool,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub upload_id: String,
    pub job_description: String,
    pub preferences: GenerationPreferences,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

impl GenerationRequest {
    pub fn new(
        upload_id: Option<String>,
        job_description: Option<String>,
        preferences: Option<GenerationPreferences>,
    ) -> Result<Self, ValidationError> {
        let upload_id = non_blank(upload_id).ok_or(ValidationError::MissingField("uploadId"))?;
        let job_description = non_blank(job_description)
            .ok_or(ValidationError::MissingField("jobDescription"))?;

        Ok(Self {
            upload_id,
            job_description,
            preferences: preferences.unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
