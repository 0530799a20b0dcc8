use super::DocumentType;

pub const PACKAGE_SELECTOR: &str = "package";
pub const ANALYSIS_SELECTOR: &str = "analysis";

/// Which artifact of a completed job a download call asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadSelector {
    Directory,
    Package,
    Analysis,
    Document(DocumentType),
}

impl DownloadSelector {
    /// Resolves the optional path segment and `format` query flag of a
    /// download request. `format=package` wins over any path segment.
    pub fn from_request(segment: Option<&str>, format: Option<&str>) -> Self {
        if format == Some(PACKAGE_SELECTOR) {
            return Self::Package;
        }

        match segment {
            None | Some("") => Self::Directory,
            Some(PACKAGE_SELECTOR) => Self::Package,
            Some(ANALYSIS_SELECTOR) => Self::Analysis,
            Some(other) => Self::Document(DocumentType::new(other)),
        }
    }
}
