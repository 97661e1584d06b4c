//! Append-only JSON-lines timing log.
//!
//! Each finished [`TimingSession`] becomes one line:
//! ```text
//! {"timestamp_utc":"...","attacker_id":10,...,"parry_succeeded":true}
//! {"timestamp_utc":"...","attacker_id":11,...,"parry_succeeded":false}
//! ```
//! Every record goes to the file in a single unbuffered write, so an
//! interrupted session keeps everything it resolved. A write that fails
//! part way is cut back off the file instead of being retried.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parry_core::{TelemetryError, TelemetrySink, TimingSession};

pub struct JsonlTimingLog {
    path: PathBuf,
    file: File,
    /// Records appended through this handle.
    written: u64,
}

impl JsonlTimingLog {
    /// Opens `base_dir/filename` for appending, creating both if needed.
    pub fn open_or_create(
        base_dir: impl AsRef<Path>,
        filename: impl AsRef<str>,
    ) -> Result<Self, TelemetryError> {
        let base_dir = base_dir.as_ref();
        std::fs::create_dir_all(base_dir)?;

        let path = base_dir.join(filename.as_ref());
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let existing = file.metadata()?.len();

        tracing::debug!(
            "Opened/created timing log: {} at offset {}",
            path.display(),
            existing
        );

        Ok(Self {
            path,
            file,
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Appends one record as a single line.
    ///
    /// On failure nothing of the record stays behind for a later append.
    pub fn append(&mut self, session: &TimingSession) -> Result<(), TelemetryError> {
        let mut line = serde_json::to_vec(session)
            .map_err(|e| TelemetryError::Serialization(e.to_string()))?;
        line.push(b'\n');

        let offset = self.file.metadata()?.len();
        if let Err(e) = self.file.write_all(&line) {
            self.discard_from(offset);
            return Err(e.into());
        }

        self.written += 1;
        Ok(())
    }

    /// Truncates a torn record back to `offset`.
    fn discard_from(&mut self, offset: u64) {
        let torn = self
            .file
            .metadata()
            .map(|meta| meta.len() > offset)
            .unwrap_or(false);
        if !torn {
            return;
        }
        if let Err(e) = self.file.set_len(offset) {
            tracing::warn!(
                "Failed to drop partial record from {}: {}",
                self.path.display(),
                e
            );
        }
    }

    /// Reads every record in the file, oldest first.
    ///
    /// Blank lines are skipped; any other unparsable line is an error.
    pub fn read_all(&self) -> Result<Vec<TimingSession>, TelemetryError> {
        Self::read_path(&self.path)
    }

    /// Reads every record from a timing log at `path`.
    pub fn read_path(path: impl AsRef<Path>) -> Result<Vec<TimingSession>, TelemetryError> {
        let reader = BufReader::new(File::open(path.as_ref())?);

        let mut records = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| {
                TelemetryError::Serialization(format!("line {}: {}", number + 1, e))
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

impl TelemetrySink for JsonlTimingLog {
    fn record(&mut self, session: &TimingSession) -> Result<(), TelemetryError> {
        self.append(session)
    }
}
