use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::GenerationStage;

use super::{CoverLetterWriter, JobDescriptionAnalyzer, ReferencesWriter, ResumeWriter};

pub struct StageFactory;

impl StageFactory {
    /// The default pipeline in execution order. `stage_delay` simulates the
    /// latency of a real generation backend.
    pub fn create(stage_delay: Duration) -> Vec<Arc<dyn GenerationStage>> {
        vec![
            Arc::new(JobDescriptionAnalyzer::new(stage_delay)),
            Arc::new(ResumeWriter::new(stage_delay)),
            Arc::new(CoverLetterWriter::new(stage_delay)),
            Arc::new(ReferencesWriter::new(stage_delay)),
        ]
    }
}
