use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::sync::Mutex;

use zip::ZipArchive;

use crate::errors::DatasetError;
use crate::transport::{ByteReader, ImageBytes};
use crate::types::SequenceId;

#[derive(Debug, Default)]
struct ReaderState {
    pending: Vec<(String, SequenceId)>,
    archive: Option<ZipArchive<BufReader<File>>>,
    entries: HashMap<SequenceId, usize>,
}

/// Reads members of one zip container.
///
/// Members are enqueued during indexing and resolved to entry indices in a
/// single [`build_index`](Self::build_index) pass, so a missing member fails
/// dataset construction instead of a training step. Reads seek within the
/// shared archive handle and therefore serialize on an internal lock.
#[derive(Debug)]
pub struct ZipByteReader {
    container: String,
    state: Mutex<ReaderState>,
}

impl ZipByteReader {
    /// Creates a reader for the container at `container`.
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            state: Mutex::new(ReaderState::default()),
        }
    }

    /// Path of the backing container.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Records that `sequence_id` will read `member` once the index is built.
    pub fn enqueue_member(&self, member: impl Into<String>, sequence_id: SequenceId) {
        self.state
            .lock()
            .expect("zip reader poisoned")
            .pending
            .push((member.into(), sequence_id));
    }

    /// Opens the archive and resolves every enqueued member to its entry index.
    pub fn build_index(&self) -> Result<(), DatasetError> {
        let mut state = self.state.lock().expect("zip reader poisoned");
        let file = File::open(&self.container).map_err(|err| DatasetError::Archive {
            container: self.container.clone(),
            reason: err.to_string(),
        })?;
        let archive =
            ZipArchive::new(BufReader::new(file)).map_err(|err| DatasetError::Archive {
                container: self.container.clone(),
                reason: err.to_string(),
            })?;

        let pending = std::mem::take(&mut state.pending);
        let mut entries = HashMap::with_capacity(pending.len());
        for (member, sequence_id) in pending {
            let index = archive
                .index_for_name(&member)
                .ok_or_else(|| DatasetError::Archive {
                    container: self.container.clone(),
                    reason: format!("member '{member}' not found"),
                })?;
            entries.insert(sequence_id, index);
        }
        state.entries = entries;
        state.archive = Some(archive);
        Ok(())
    }

    /// Number of members resolved by [`build_index`](Self::build_index).
    pub fn member_count(&self) -> usize {
        self.state.lock().expect("zip reader poisoned").entries.len()
    }
}

impl ByteReader for ZipByteReader {
    fn read(&self, sequence_id: SequenceId, _path: &str) -> Result<ImageBytes, DatasetError> {
        let mut state = self.state.lock().expect("zip reader poisoned");
        let index = *state
            .entries
            .get(&sequence_id)
            .ok_or_else(|| DatasetError::Archive {
                container: self.container.clone(),
                reason: format!("no member registered for sequence {sequence_id}"),
            })?;
        let archive = state.archive.as_mut().ok_or_else(|| DatasetError::Archive {
            container: self.container.clone(),
            reason: "archive index has not been built".to_string(),
        })?;
        let mut entry = archive.by_index(index).map_err(|err| DatasetError::Archive {
            container: self.container.clone(),
            reason: err.to_string(),
        })?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|err| DatasetError::Archive {
                container: self.container.clone(),
                reason: err.to_string(),
            })?;
        Ok(ImageBytes::Owned(bytes.into()))
    }
}
