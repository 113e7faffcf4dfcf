// Uploader - hands the sample file to the service

use crate::domain::JobId;
use crate::error::{Result, Step, SubmitError};
use crate::port::SubmissionTransport;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Check the sample is a readable regular file before any network call
pub fn verify_sample(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(SubmitError::FileNotFound(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(SubmitError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(SubmitError::Io(e)),
    }
}

/// Name the service sees for the uploaded sample (base name only)
pub fn sample_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct Uploader<'a> {
    transport: &'a dyn SubmissionTransport,
}

impl<'a> Uploader<'a> {
    pub fn new(transport: &'a dyn SubmissionTransport) -> Self {
        Self { transport }
    }

    /// Upload the sample and return the job id the service assigned.
    ///
    /// The file handle is moved into the transport and closed when the
    /// upload returns, whether it succeeded or not.
    pub fn upload(&self, path: &Path) -> Result<JobId> {
        let file_name = sample_file_name(path);
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SubmitError::FileNotFound(path.to_path_buf()),
            _ => SubmitError::Io(e),
        })?;

        debug!(file_name = %file_name, "Uploading sample");

        let receipt = self
            .transport
            .upload(&file_name, file)
            .map_err(|e| SubmitError::from_transport(Step::Upload, e))?;

        if receipt.id.trim().is_empty() {
            return Err(SubmitError::Upload("no job ID received".to_string()));
        }

        info!(job_id = %receipt.id, file_name = %file_name, "Sample uploaded");
        Ok(receipt.id)
    }
}
