//! Byte acquisition for indexed samples.
//!
//! Ownership model: the [`ReaderRegistry`] owns one default reader for plain
//! file paths plus one [`ZipByteReader`] per distinct container, shared via
//! `Arc` by every sequence that lives in that container. Readers hand out
//! [`ImageBytes`], which either owns its buffer or borrows a shared memory
//! map; both forms stay valid after the registry or chunk that produced them
//! is dropped.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use memmap2::Mmap;

use crate::constants::manifest;
use crate::errors::DatasetError;
use crate::types::SequenceId;

mod fs;
#[cfg(feature = "zip")]
mod zip;

pub use fs::{FileByteReader, MmapByteReader};
#[cfg(feature = "zip")]
pub use zip::ZipByteReader;

/// Raw image bytes, either owned or viewed through a shared memory map.
#[derive(Clone)]
pub enum ImageBytes {
    /// Heap-owned buffer.
    Owned(Arc<[u8]>),
    /// View over a whole memory-mapped file.
    Mapped(Arc<Mmap>),
}

impl Deref for ImageBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            ImageBytes::Owned(bytes) => bytes,
            ImageBytes::Mapped(map) => map,
        }
    }
}

impl AsRef<[u8]> for ImageBytes {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl std::fmt::Debug for ImageBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            ImageBytes::Owned(_) => "Owned",
            ImageBytes::Mapped(_) => "Mapped",
        };
        f.debug_struct("ImageBytes")
            .field("kind", &kind)
            .field("len", &self.len())
            .finish()
    }
}

/// Fetches the raw bytes of one sample.
pub trait ByteReader: Send + Sync {
    /// Reads the bytes for `sequence_id`, stored at `path`.
    fn read(&self, sequence_id: SequenceId, path: &str) -> Result<ImageBytes, DatasetError>;
}

/// Routes each sequence to the reader that can serve its path.
///
/// Plain paths go through the default reader; `container@/member` paths are
/// bound to the container's [`ZipByteReader`] at registration time.
pub struct ReaderRegistry {
    default_reader: Box<dyn ByteReader>,
    assigned: HashMap<SequenceId, Arc<dyn ByteReader>>,
    #[cfg(feature = "zip")]
    containers: indexmap::IndexMap<String, Arc<ZipByteReader>>,
}

impl ReaderRegistry {
    /// Registry with the given default reader for plain paths.
    pub fn new(default_reader: Box<dyn ByteReader>) -> Self {
        Self {
            default_reader,
            assigned: HashMap::new(),
            #[cfg(feature = "zip")]
            containers: indexmap::IndexMap::new(),
        }
    }

    /// Registry whose plain-path reader is chosen by the `mmap` flag.
    pub fn with_default_transport(mmap: bool) -> Self {
        if mmap {
            Self::new(Box::new(MmapByteReader))
        } else {
            Self::new(Box::new(FileByteReader))
        }
    }

    /// Registers the reader for one indexed sequence.
    ///
    /// Plain paths need no per-sequence state and fall through to the
    /// default reader; container paths enqueue the member for the batch
    /// index build.
    pub fn register(&mut self, sequence_id: SequenceId, path: &str) -> Result<(), DatasetError> {
        match path.find(manifest::CONTAINER_SEPARATOR) {
            Some(at) => self.register_container(sequence_id, path, at),
            None => Ok(()),
        }
    }

    #[cfg(feature = "zip")]
    fn register_container(
        &mut self,
        sequence_id: SequenceId,
        path: &str,
        at: usize,
    ) -> Result<(), DatasetError> {
        let container = &path[..at];
        // The marker and the separator that follows it are both dropped;
        // member names inside archives never start with a separator.
        let mut member = path.get(at + 2..).unwrap_or("").to_string();
        if member.contains('\\') {
            member = member.replace('\\', manifest::ARCHIVE_SEPARATOR);
        }
        let reader = self
            .containers
            .entry(container.to_string())
            .or_insert_with(|| Arc::new(ZipByteReader::new(container)))
            .clone();
        reader.enqueue_member(member, sequence_id);
        self.assigned.insert(sequence_id, reader as Arc<dyn ByteReader>);
        Ok(())
    }

    #[cfg(not(feature = "zip"))]
    fn register_container(
        &mut self,
        _sequence_id: SequenceId,
        path: &str,
        _at: usize,
    ) -> Result<(), DatasetError> {
        Err(DatasetError::ContainerUnsupported {
            path: path.to_string(),
        })
    }

    /// Builds the member index of every registered container.
    pub fn build_archive_indexes(&self) -> Result<(), DatasetError> {
        #[cfg(feature = "zip")]
        for reader in self.containers.values() {
            reader.build_index()?;
        }
        Ok(())
    }

    /// Number of distinct containers seen during registration.
    pub fn container_count(&self) -> usize {
        #[cfg(feature = "zip")]
        {
            self.containers.len()
        }
        #[cfg(not(feature = "zip"))]
        {
            0
        }
    }

    /// Fetches the bytes for `sequence_id` through its bound reader.
    pub fn read_image(
        &self,
        sequence_id: SequenceId,
        path: &str,
    ) -> Result<ImageBytes, DatasetError> {
        match self.assigned.get(&sequence_id) {
            Some(reader) => reader.read(sequence_id, path),
            None => self.default_reader.read(sequence_id, path),
        }
    }
}

impl std::fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderRegistry")
            .field("assigned", &self.assigned.len())
            .field("containers", &self.container_count())
            .finish()
    }
}
