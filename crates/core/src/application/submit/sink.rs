// Artifact sinks - where the generated rules end up

use crate::domain::Artifact;
use crate::error::{Result, SubmitError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Destination for the artifact; bytes are written verbatim
pub trait ArtifactSink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<()>;
}

/// Writes the artifact to a file, replacing any previous content
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactSink for FileSink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<()> {
        std::fs::write(&self.path, artifact.as_bytes()).map_err(|source| SubmitError::Output {
            path: self.path.clone(),
            source,
        })
    }
}

/// Writes the artifact to any stream (stdout in the CLI)
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ArtifactSink for WriterSink<W> {
    fn deliver(&mut self, artifact: &Artifact) -> Result<()> {
        self.writer.write_all(artifact.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}
