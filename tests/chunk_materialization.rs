//! Chunk materialization and per-sequence decode over real image files.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{ImageFormat, Rgb, RgbImage};
use imageset::{
    CorpusDescriptor, DatasetConfig, DatasetError, ElementKind, ImageDataset, LabelValue,
};
use tempfile::TempDir;

fn write_png(dir: &Path, name: &str, width: u32, height: u32, fill: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    let image = RgbImage::from_pixel(width, height, Rgb(fill));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    fs::write(&path, bytes).unwrap();
    path
}

fn two_image_fixture(dir: &TempDir) -> PathBuf {
    let cat = write_png(dir.path(), "cat.png", 8, 6, [200, 10, 10]);
    let dog = write_png(dir.path(), "dog.png", 4, 4, [10, 200, 10]);
    let manifest = dir.path().join("map.txt");
    fs::write(
        &manifest,
        format!(
            "cat-1\t{}\t0\ndog-1\t{}\t1\n",
            cat.display(),
            dog.display()
        ),
    )
    .unwrap();
    manifest
}

fn open_full(
    manifest: &Path,
    config: DatasetConfig,
) -> Result<ImageDataset, DatasetError> {
    ImageDataset::open(manifest, config, Arc::new(CorpusDescriptor::full()))
}

#[test]
fn materialized_chunk_decodes_samples_and_labels() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = two_image_fixture(&dir);
    let dataset = open_full(&manifest, DatasetConfig::new(2)).unwrap();

    let chunk = dataset.get_chunk(0).unwrap();
    assert_eq!(chunk.descriptor().num_samples, 2);

    let (cat, cat_label) = chunk.get_sequence(0).unwrap();
    assert_eq!(cat.shape(), (8, 6, 3));
    assert_eq!(cat.element(), ElementKind::U8);
    assert_eq!(cat_label.index, 0);
    assert_eq!(cat_label.value, LabelValue::F32(1.0));
    assert_eq!(cat_label.to_dense(), vec![1.0, 0.0]);

    let (dog, dog_label) = chunk.get_sequence(1).unwrap();
    assert_eq!(dog.shape(), (4, 4, 3));
    assert_eq!(dog_label.to_dense(), vec![0.0, 1.0]);
}

#[test]
fn grayscale_config_yields_single_channel_samples() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = two_image_fixture(&dir);
    let dataset = open_full(&manifest, DatasetConfig::new(2).with_grayscale(true)).unwrap();

    let chunk = dataset.get_chunk(0).unwrap();
    let (sample, _) = chunk.get_sequence(0).unwrap();
    assert_eq!(sample.shape(), (8, 6, 1));
    assert_eq!(sample.pixels().len(), 8 * 6);
}

#[test]
fn mmap_transport_produces_identical_samples() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = two_image_fixture(&dir);
    let buffered = open_full(&manifest, DatasetConfig::new(2)).unwrap();
    let mapped = open_full(&manifest, DatasetConfig::new(2).with_mmap(true)).unwrap();

    let (a, _) = buffered.get_chunk(0).unwrap().get_sequence(0).unwrap();
    let (b, _) = mapped.get_chunk(0).unwrap().get_sequence(0).unwrap();
    assert_eq!(a.raw_bytes(), b.raw_bytes());
    assert_eq!(a.pixels(), b.pixels());
}

#[test]
fn sample_outlives_its_chunk_handle() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = two_image_fixture(&dir);
    let dataset = open_full(&manifest, DatasetConfig::new(2)).unwrap();

    let sample = {
        let chunk = dataset.get_chunk(0).unwrap();
        let (sample, _) = chunk.get_sequence(0).unwrap();
        sample
    };
    // The sample's back-reference keeps the chunk's bytes alive.
    assert_eq!(sample.shape(), (8, 6, 3));
    assert!(!sample.raw_bytes().is_empty());
    assert_eq!(sample.chunk().descriptor().id, 0);
}

#[test]
fn sequence_outside_the_chunk_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = two_image_fixture(&dir);
    let dataset = open_full(&manifest, DatasetConfig::new(2)).unwrap();

    let chunk = dataset.get_chunk(0).unwrap();
    assert!(matches!(
        chunk.get_sequence(7).unwrap_err(),
        DatasetError::SequenceOutOfChunk {
            sequence_id: 7,
            chunk_id: 0,
        }
    ));
}

#[test]
fn corrupt_image_fails_decode_with_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.png");
    fs::write(&bad, b"definitely not a png").unwrap();
    let manifest = dir.path().join("map.txt");
    fs::write(&manifest, format!("k0\t{}\t0\n", bad.display())).unwrap();

    let dataset = open_full(&manifest, DatasetConfig::new(1)).unwrap();
    let chunk = dataset.get_chunk(0).unwrap();
    match chunk.get_sequence(0).unwrap_err() {
        DatasetError::ImageDecode { path, .. } => assert!(path.ends_with("bad.png")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_image_file_fails_materialization_not_open() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("map.txt");
    fs::write(&manifest, "k0\t/nonexistent/ghost.png\t0\n").unwrap();

    // Indexing never touches image bytes.
    let dataset = open_full(&manifest, DatasetConfig::new(1)).unwrap();
    assert!(dataset.get_chunk(0).is_err());
}

#[test]
fn chunks_materialize_across_threads() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = two_image_fixture(&dir);
    let dataset = open_full(&manifest, DatasetConfig::new(2)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dataset = dataset.clone();
            std::thread::spawn(move || {
                let chunk = dataset.get_chunk(0).unwrap();
                let (sample, label) = chunk.get_sequence(1).unwrap();
                (sample.shape(), label.index)
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), ((4, 4, 3), 1));
    }
}
