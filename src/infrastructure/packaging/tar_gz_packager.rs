use std::io::Write;

use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;

use crate::application::ports::{ArtifactPackager, PackagingError};
use crate::domain::{DocumentType, GeneratedDocument, JobId};

pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    job_id: &'a str,
    created_at: String,
    documents: Vec<ManifestEntry<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry<'a> {
    document_type: &'a str,
    path: String,
    content_type: &'a str,
    size_bytes: u64,
}

/// Writes a gzip-compressed tar archive: one entry per document under a
/// directory named after the job, plus a `manifest.json` at the root.
pub struct TarGzPackager {
    compression: Compression,
}

impl TarGzPackager {
    pub fn new() -> Self {
        Self {
            compression: Compression::default(),
        }
    }

    pub fn with_compression(level: u32) -> Self {
        Self {
            compression: Compression::new(level.min(9)),
        }
    }
}

impl Default for TarGzPackager {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactPackager for TarGzPackager {
    fn file_extension(&self) -> &'static str {
        "tar.gz"
    }

    fn content_type(&self) -> &'static str {
        "application/gzip"
    }

    fn package(
        &self,
        job_id: &JobId,
        documents: &[(DocumentType, GeneratedDocument)],
    ) -> Result<Bytes, PackagingError> {
        let mtime = chrono::Utc::now().timestamp().max(0) as u64;
        let encoder = GzEncoder::new(Vec::new(), self.compression);
        let mut builder = tar::Builder::new(encoder);

        let mut entries = Vec::with_capacity(documents.len());
        for (document_type, document) in documents {
            let path = format!("{}/{}", job_id, document.filename);
            append_entry(&mut builder, &path, &document.content, mtime)?;
            entries.push(ManifestEntry {
                document_type: document_type.as_str(),
                path,
                content_type: &document.content_type,
                size_bytes: document.size_bytes(),
            });
        }

        let manifest = Manifest {
            job_id: job_id.as_str(),
            created_at: chrono::Utc::now().to_rfc3339(),
            documents: entries,
        };
        let manifest_bytes = serde_json::to_vec_pretty(&manifest)?;
        append_entry(&mut builder, MANIFEST_FILENAME, &manifest_bytes, mtime)?;

        let mut encoder = builder.into_inner()?;
        encoder.flush()?;
        let archive = encoder.finish()?;

        Ok(Bytes::from(archive))
    }
}

fn append_entry<W: Write>(
    builder: &mut tar::Builder<W>,
    path: &str,
    data: &[u8],
    mtime: u64,
) -> Result<(), PackagingError> {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(mtime);
    header.set_cksum();
    builder.append_data(&mut header, path, data)?;
    Ok(())
}
