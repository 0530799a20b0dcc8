mod document_writers;
mod job_description_analyzer;
mod stage_factory;

pub use document_writers::{
    COVER_LETTER, CoverLetterWriter, REFERENCES, RESUME, ReferencesWriter, ResumeWriter,
};
pub use job_description_analyzer::{JobDescriptionAnalyzer, PostingSummary, summarize_posting};
pub use stage_factory::StageFactory;
