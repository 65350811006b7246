use std::fs::{self, File};
use std::sync::Arc;

use memmap2::Mmap;

use crate::errors::DatasetError;
use crate::transport::{ByteReader, ImageBytes};
use crate::types::SequenceId;

/// Reads whole files into owned buffers.
#[derive(Debug, Default)]
pub struct FileByteReader;

impl ByteReader for FileByteReader {
    fn read(&self, _sequence_id: SequenceId, path: &str) -> Result<ImageBytes, DatasetError> {
        let bytes = fs::read(path)?;
        Ok(ImageBytes::Owned(bytes.into()))
    }
}

/// Maps whole files into memory and hands out zero-copy views.
#[derive(Debug, Default)]
pub struct MmapByteReader;

impl ByteReader for MmapByteReader {
    fn read(&self, _sequence_id: SequenceId, path: &str) -> Result<ImageBytes, DatasetError> {
        let file = File::open(path)?;
        // SAFETY: the file is opened read-only and never written through the map.
        let mmap = unsafe { Mmap::map(&file) }?;
        Ok(ImageBytes::Mapped(Arc::new(mmap)))
    }
}
