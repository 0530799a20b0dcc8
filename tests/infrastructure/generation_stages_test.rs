use std::time::Duration;

use jobcraft::application::ports::{GenerationContext, GenerationStage, StageError};
use jobcraft::domain::{
    DocumentType, GeneratedDocument, GenerationPreferences, GenerationRequest, JobId, Tone,
};
use jobcraft::infrastructure::generation::{
    COVER_LETTER, CoverLetterWriter, JobDescriptionAnalyzer, REFERENCES, RESUME,
    ReferencesWriter, ResumeWriter, StageFactory, summarize_posting,
};

use crate::helpers::{TECHCORP_DESCRIPTION, sample_request};

fn context(request: GenerationRequest) -> GenerationContext {
    GenerationContext::new(JobId::new(), request)
}

async fn run_all(context: &mut GenerationContext) {
    for stage in StageFactory::create(Duration::ZERO) {
        stage.run(context).await.unwrap();
    }
}

fn document_text(context: &GenerationContext, document_type: &str) -> String {
    let document = &context.documents[&DocumentType::new(document_type)];
    String::from_utf8(document.content.to_vec()).unwrap()
}

#[test]
fn given_selector_name_when_adding_document_then_rejected_as_reserved() {
    let mut context = context(sample_request());

    for reserved in ["package", "analysis"] {
        let result = context.add_document(
            DocumentType::new(reserved),
            GeneratedDocument::new(format!("{}.md", reserved), "text/markdown", "body"),
        );

        assert!(matches!(result, Err(StageError::InvalidInput(_))), "{}", reserved);
    }
    assert!(context.documents.is_empty());
}

#[test]
fn given_techcorp_posting_when_summarizing_then_title_company_and_requirements_found() {
    let summary = summarize_posting(TECHCORP_DESCRIPTION);

    assert_eq!(summary.title, "Software Engineer");
    assert_eq!(summary.company.as_deref(), Some("TechCorp"));
    assert_eq!(summary.requirements.len(), 6);
    assert_eq!(
        summary.requirements[0],
        "3+ years of experience in JavaScript/Node.js"
    );
    assert_eq!(summary.min_years_experience, Some(3));
}

#[test]
fn given_posting_without_company_when_summarizing_then_company_absent() {
    let summary = summarize_posting("Staff Engineer\n\n- 10 years building databases");

    assert_eq!(summary.title, "Staff Engineer");
    assert!(summary.company.is_none());
    assert_eq!(summary.min_years_experience, Some(10));
}

#[test]
fn given_default_factory_when_creating_then_stages_in_pipeline_order() {
    let names: Vec<String> = StageFactory::create(Duration::ZERO)
        .iter()
        .map(|s| s.name().to_string())
        .collect();

    assert_eq!(
        names,
        vec![
            "Analyzing job description",
            "Generating resume",
            "Writing cover letter",
            "Compiling references",
        ]
    );
}

#[tokio::test]
async fn given_full_pipeline_when_run_then_documents_and_analysis_produced() {
    let mut ctx = context(sample_request());

    run_all(&mut ctx).await;

    assert!(ctx.documents.contains_key(&DocumentType::new(RESUME)));
    assert!(ctx.documents.contains_key(&DocumentType::new(COVER_LETTER)));
    assert!(ctx.documents.contains_key(&DocumentType::new(REFERENCES)));
    assert_eq!(ctx.analysis["company"], "TechCorp");
    assert_eq!(ctx.analysis["uploadId"], "test-upload-123");
    assert!(document_text(&ctx, RESUME).contains("Strong problem-solving skills"));
    assert!(document_text(&ctx, COVER_LETTER).contains("Dear Hiring Manager,"));
}

#[tokio::test]
async fn given_references_not_requested_when_run_then_no_references_document() {
    let mut request = sample_request();
    request.preferences.include_references = false;
    let mut ctx = context(request);

    run_all(&mut ctx).await;

    assert!(!ctx.documents.contains_key(&DocumentType::new(REFERENCES)));
    assert_eq!(ctx.documents.len(), 2);
}

#[tokio::test]
async fn given_casual_tone_when_writing_cover_letter_then_casual_salutation() {
    let mut request = sample_request();
    request.preferences = GenerationPreferences {
        include_references: false,
        tone: Tone::Casual,
    };
    let mut ctx = context(request);

    run_all(&mut ctx).await;

    let letter = document_text(&ctx, COVER_LETTER);
    assert!(letter.starts_with("Hi there,"));
    assert!(letter.contains("Cheers,"));
}

#[tokio::test]
async fn given_unanalyzed_context_when_writing_documents_then_invalid_input() {
    let mut ctx = context(sample_request());

    let resume = ResumeWriter::new(Duration::ZERO).run(&mut ctx).await;
    let letter = CoverLetterWriter::new(Duration::ZERO).run(&mut ctx).await;

    assert!(matches!(resume, Err(StageError::InvalidInput(_))));
    assert!(matches!(letter, Err(StageError::InvalidInput(_))));
    assert!(ctx.documents.is_empty());
}

#[tokio::test]
async fn given_references_writer_when_requested_then_markdown_document_added() {
    let mut ctx = context(sample_request());

    ReferencesWriter::new(Duration::ZERO)
        .run(&mut ctx)
        .await
        .unwrap();

    let document = &ctx.documents[&DocumentType::new(REFERENCES)];
    assert_eq!(document.filename, "references.md");
    assert!(document.content_type.starts_with("text/markdown"));
}

#[tokio::test]
async fn given_analyzer_when_run_then_preferences_recorded_in_analysis() {
    let mut ctx = context(sample_request());

    JobDescriptionAnalyzer::new(Duration::ZERO)
        .run(&mut ctx)
        .await
        .unwrap();

    assert_eq!(ctx.analysis["tone"], "professional");
    assert_eq!(ctx.analysis["includeReferences"], true);
    assert_eq!(ctx.analysis["requirementCount"], 6);
}
