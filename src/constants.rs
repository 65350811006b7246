/// Constants used by chunk assembly.
pub mod chunking {
    /// Default upper bound on samples per chunk; the final chunk may be smaller.
    pub const DEFAULT_MAX_CHUNK_SAMPLES: usize = 512;
}

/// Constants used by manifest parsing and container-path splitting.
pub mod manifest {
    /// Column delimiter for manifest lines.
    pub const COLUMN_DELIMITER: char = '\t';
    /// Marker separating a container path from a member path.
    pub const CONTAINER_SEPARATOR: char = '@';
    /// Canonical member-path separator inside archives.
    pub const ARCHIVE_SEPARATOR: &str = "/";
}

/// Constants controlling per-line sequence fan-out.
pub mod views {
    /// Sequences spawned per manifest line in single-view mode.
    pub const SINGLE_VIEW_ITEMS_PER_LINE: usize = 1;
    /// Sequences spawned per manifest line in multi-view crop mode.
    pub const MULTI_VIEW_ITEMS_PER_LINE: usize = 10;
}

/// Constants describing the exposed stream table.
pub mod streams {
    /// Stream id for the dense decoded-image stream.
    pub const FEATURE_STREAM_ID: usize = 0;
    /// Stream id for the sparse one-hot label stream.
    pub const LABEL_STREAM_ID: usize = 1;
    /// Default name for the dense feature stream.
    pub const DEFAULT_FEATURE_STREAM_NAME: &str = "features";
    /// Default name for the sparse label stream.
    pub const DEFAULT_LABEL_STREAM_NAME: &str = "labels";
}
