use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{GenerationContext, GenerationStage, StageError};
use crate::domain::{DocumentType, GeneratedDocument, Tone};

const MARKDOWN: &str = "text/markdown; charset=utf-8";

pub const RESUME: &str = "resume";
pub const COVER_LETTER: &str = "cover_letter";
pub const REFERENCES: &str = "references";

fn analysis_str<'a>(context: &'a GenerationContext, key: &str) -> Option<&'a str> {
    context.analysis.get(key).and_then(|v| v.as_str())
}

fn requirements(context: &GenerationContext) -> Result<Vec<String>, StageError> {
    let value = context.analysis.get("requirements").ok_or_else(|| {
        StageError::InvalidInput("job description has not been analyzed".to_string())
    })?;
    Ok(value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default())
}

fn salutation(tone: Tone) -> &'static str {
    match tone {
        Tone::Casual => "Hi there,",
        Tone::Enthusiastic => "Hello!",
        Tone::Formal => "Dear Sir or Madam,",
        Tone::Professional | Tone::Unrecognized => "Dear Hiring Manager,",
    }
}

fn closing(tone: Tone) -> &'static str {
    match tone {
        Tone::Casual => "Cheers,",
        Tone::Enthusiastic => "Looking forward to hearing from you!",
        Tone::Formal => "Yours faithfully,",
        Tone::Professional | Tone::Unrecognized => "Kind regards,",
    }
}

pub struct ResumeWriter {
    delay: Duration,
}

impl ResumeWriter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl GenerationStage for ResumeWriter {
    fn name(&self) -> &str {
        "Generating resume"
    }

    async fn run(&self, context: &mut GenerationContext) -> Result<(), StageError> {
        tokio::time::sleep(self.delay).await;

        let title = analysis_str(context, "title").unwrap_or("Candidate").to_string();
        let mut body = format!("# Resume\n\n## Target role\n\n{}\n\n## Highlights\n\n", title);
        for requirement in requirements(context)? {
            body.push_str(&format!("- {}\n", requirement));
        }
        body.push_str(&format!(
            "\n_Source material: upload {}_\n",
            context.request.upload_id
        ));

        context.add_document(
            DocumentType::new(RESUME),
            GeneratedDocument::new("resume.md", MARKDOWN, body),
        )
    }
}

pub struct CoverLetterWriter {
    delay: Duration,
}

impl CoverLetterWriter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl GenerationStage for CoverLetterWriter {
    fn name(&self) -> &str {
        "Writing cover letter"
    }

    async fn run(&self, context: &mut GenerationContext) -> Result<(), StageError> {
        tokio::time::sleep(self.delay).await;

        let tone = context.request.preferences.tone;
        let title = analysis_str(context, "title").unwrap_or("the open role");
        let company = analysis_str(context, "company").unwrap_or("your company");
        let focus = requirements(context)?
            .into_iter()
            .take(3)
            .collect::<Vec<_>>()
            .join("; ");

        let body = format!(
            "{}\n\nI am applying for the {} role at {}. My background lines up with what you \
             are looking for: {}.\n\n{}\n",
            salutation(tone),
            title,
            company,
            if focus.is_empty() {
                "the role as described"
            } else {
                focus.as_str()
            },
            closing(tone),
        );

        context.add_document(
            DocumentType::new(COVER_LETTER),
            GeneratedDocument::new("cover_letter.md", MARKDOWN, body),
        )
    }
}

/// Only produces a document when the request asked for references.
pub struct ReferencesWriter {
    delay: Duration,
}

impl ReferencesWriter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl GenerationStage for ReferencesWriter {
    fn name(&self) -> &str {
        "Compiling references"
    }

    async fn run(&self, context: &mut GenerationContext) -> Result<(), StageError> {
        if !context.request.preferences.include_references {
            return Ok(());
        }
        tokio::time::sleep(self.delay).await;

        let body = "# References\n\nAvailable on request.\n".to_string();
        context.add_document(
            DocumentType::new(REFERENCES),
            GeneratedDocument::new("references.md", MARKDOWN, body),
        )
    }
}
