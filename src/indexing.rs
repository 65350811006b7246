use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::config::DatasetConfig;
use crate::constants::manifest;
use crate::corpus::CorpusDescriptor;
use crate::data::{ChunkDescriptor, KeyId, SequenceDescriptor};
use crate::errors::DatasetError;
use crate::transport::ReaderRegistry;
use crate::types::{ChunkId, SequenceKey};

/// Immutable index produced by one pass over the manifest.
#[derive(Debug, Default)]
pub struct IndexTables {
    /// All sequence descriptors; a sequence's id equals its position here.
    pub sequences: Vec<SequenceDescriptor>,
    /// All chunk descriptors; a chunk's id equals its position here.
    pub chunks: Vec<ChunkDescriptor>,
    /// Registry key to the global id of the first sequence carrying it.
    pub key_to_sequence: HashMap<SequenceKey, usize>,
}

/// Splits one manifest line into (key, path, class) columns.
///
/// Lines with three or more columns use the first three and ignore the rest.
/// Two-column lines are the legacy `path \t class` form; the line index
/// stands in as the key.
fn split_columns(line: &str, line_index: usize) -> Option<(String, String, String)> {
    let mut columns = line.split(manifest::COLUMN_DELIMITER);
    let first = columns.next()?;
    let second = columns.next()?;
    match columns.next() {
        Some(third) => Some((first.to_string(), second.to_string(), third.to_string())),
        None => {
            if first.is_empty() || second.is_empty() {
                return None;
            }
            Some((line_index.to_string(), first.to_string(), second.to_string()))
        }
    }
}

/// Reads the manifest at `manifest_path` and builds the sequence and chunk
/// tables, registering every path with `registry` along the way.
///
/// A chunk closes as soon as it holds at least `max_chunk_samples` samples,
/// checked before each line is added, so the sequences of one multi-view
/// line always land in the same chunk.
pub fn build_index(
    manifest_path: &Path,
    config: &DatasetConfig,
    corpus: &CorpusDescriptor,
    registry: &mut ReaderRegistry,
) -> Result<IndexTables, DatasetError> {
    let started = Instant::now();
    let manifest_name = manifest_path.display().to_string();
    let file = File::open(manifest_path).map_err(|source| DatasetError::ManifestOpen {
        path: manifest_name.clone(),
        source,
    })?;

    let mut tables = IndexTables::default();
    let mut current = ChunkDescriptor {
        id: 0,
        start_index: 0,
        num_samples: 0,
        num_sequences: 0,
    };
    let items_per_line = config.items_per_line();

    for (line_index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let (key, path, class_column) =
            split_columns(&line, line_index).ok_or_else(|| DatasetError::MalformedLine {
                path: manifest_name.clone(),
                line: line_index + 1,
            })?;
        if !corpus.is_included(&key) {
            continue;
        }
        let class_id: u64 =
            class_column
                .parse()
                .map_err(|_| DatasetError::ClassIdParse {
                    value: class_column.clone(),
                    line: line_index + 1,
                    path: manifest_name.clone(),
                })?;
        if class_id >= config.label_dimension as u64 {
            return Err(DatasetError::ClassIdOutOfRange {
                path,
                class_id,
                label_dimension: config.label_dimension,
                line: line_index + 1,
                manifest: manifest_name.clone(),
            });
        }

        if current.num_samples >= config.max_chunk_samples {
            tables.chunks.push(current);
            let next_id: ChunkId = current
                .id
                .checked_add(1)
                .ok_or(DatasetError::ChunkIdOverflow)?;
            current = ChunkDescriptor {
                id: next_id,
                start_index: tables.sequences.len(),
                num_samples: 0,
                num_sequences: 0,
            };
        }

        let sequence_key = corpus.resolve(&key);
        tables
            .key_to_sequence
            .entry(sequence_key)
            .or_insert(tables.sequences.len());

        for _ in 0..items_per_line {
            let id = tables.sequences.len();
            registry.register(id, &path)?;
            tables.sequences.push(SequenceDescriptor {
                id,
                chunk_id: current.id,
                path: path.clone(),
                class_id,
                key: KeyId::new(sequence_key),
            });
            current.num_samples += 1;
            current.num_sequences += 1;
        }
    }

    if current.num_samples > 0 {
        tables.chunks.push(current);
    }

    registry.build_archive_indexes()?;

    if config.verbosity > 1 {
        debug!(
            sequences = tables.sequences.len(),
            chunks = tables.chunks.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "indexed manifest"
        );
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_columns_pass_through() {
        let parsed = split_columns("cat-1\timages/cat.jpg\t0", 5).unwrap();
        assert_eq!(parsed, ("cat-1".into(), "images/cat.jpg".into(), "0".into()));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let parsed = split_columns("k\tp\t3\textra\tmore", 0).unwrap();
        assert_eq!(parsed.2, "3");
    }

    #[test]
    fn two_columns_use_the_line_index_as_key() {
        let parsed = split_columns("images/dog.jpg\t1", 41).unwrap();
        assert_eq!(parsed, ("41".into(), "images/dog.jpg".into(), "1".into()));
    }

    #[test]
    fn short_or_empty_lines_are_rejected() {
        assert_eq!(split_columns("", 0), None);
        assert_eq!(split_columns("just-one-column", 0), None);
        assert_eq!(split_columns("\t1", 0), None);
        assert_eq!(split_columns("path\t", 0), None);
    }
}
