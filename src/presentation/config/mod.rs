mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{LoggingSettings, PackagingSettings, ServerSettings, Settings, WorkerSettings};
