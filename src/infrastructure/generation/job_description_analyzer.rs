use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::application::ports::{GenerationContext, GenerationStage, StageError};

/// Extracts a lightweight analysis of the posting: title, company and the
/// bullet-listed requirements. The result becomes the job's analysis payload
/// and feeds the document stages that follow.
pub struct JobDescriptionAnalyzer {
    delay: Duration,
}

impl JobDescriptionAnalyzer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingSummary {
    pub title: String,
    pub company: Option<String>,
    pub requirements: Vec<String>,
    pub min_years_experience: Option<u32>,
}

pub fn summarize_posting(description: &str) -> PostingSummary {
    let mut lines = description.lines().map(str::trim).filter(|l| !l.is_empty());

    let headline = lines.next().unwrap_or_default();
    let (title, company) = match headline.rsplit_once(" at ") {
        Some((title, company)) => (title.trim(), Some(company.trim().trim_end_matches('.'))),
        None => (headline, None),
    };
    let title = title
        .trim_end_matches(" Position")
        .trim_end_matches(" position")
        .to_string();

    let requirements: Vec<String> = lines
        .filter_map(|l| l.strip_prefix('-').or_else(|| l.strip_prefix('•')))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();

    let min_years_experience = requirements.iter().find_map(|r| years_of_experience(r));

    PostingSummary {
        title,
        company: company.map(str::to_string),
        requirements,
        min_years_experience,
    }
}

fn years_of_experience(requirement: &str) -> Option<u32> {
    let lowered = requirement.to_lowercase();
    let idx = lowered.find("year")?;
    lowered[..idx]
        .split(|c: char| !c.is_ascii_digit())
        .rev()
        .find(|s| !s.is_empty())
        .and_then(|digits| digits.parse().ok())
}

#[async_trait]
impl GenerationStage for JobDescriptionAnalyzer {
    fn name(&self) -> &str {
        "Analyzing job description"
    }

    async fn run(&self, context: &mut GenerationContext) -> Result<(), StageError> {
        tokio::time::sleep(self.delay).await;

        let summary = summarize_posting(&context.request.job_description);
        if summary.title.is_empty() {
            return Err(StageError::InvalidInput(
                "job description has no headline".to_string(),
            ));
        }

        let preferences = &context.request.preferences;
        let analysis = json!({
            "title": summary.title,
            "company": summary.company,
            "requirements": summary.requirements,
            "minYearsExperience": summary.min_years_experience,
            "requirementCount": summary.requirements.len(),
            "wordCount": context.request.job_description.split_whitespace().count(),
            "uploadId": context.request.upload_id,
            "tone": preferences.tone.as_str(),
            "includeReferences": preferences.include_references,
        });

        if let Value::Object(map) = analysis {
            context.analysis.extend(map);
        }
        Ok(())
    }
}
