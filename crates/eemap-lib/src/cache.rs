//! Staged snapshots of the starmap graph.
//!
//! The build pipeline stores the graph after each stage so later runs can skip
//! the database. A snapshot that cannot be read back is reported as a cache
//! miss, never as an error: the pipeline rebuilds instead.
//!
//! # Serialization Format
//!
//! ```text
//! Header (16 bytes):
//!   - Magic: b"EEMC" (4 bytes)
//!   - Version: u8 (1 byte)
//!   - Stage: u8 (1 byte)
//!   - Reserved: 2 bytes
//!   - Node count: u32 (4 bytes)
//!   - Edge count: u32 (4 bytes)
//!
//! Body:
//!   - postcard-serialized Starmap
//!   - zstd compressed
//!
//! Footer (32 bytes):
//!   - SHA-256 checksum of compressed body
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::RwLock;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::starmap::Starmap;

/// Magic bytes identifying a stage snapshot.
const CACHE_MAGIC: &[u8; 4] = b"EEMC";

/// Current snapshot format version.
const CACHE_VERSION: u8 = 1;

/// Header size in bytes.
const HEADER_SIZE: usize = 16;

/// Checksum size in bytes (SHA-256).
const CHECKSUM_SIZE: usize = 32;

/// zstd compression level (balanced speed/ratio).
const COMPRESSION_LEVEL: i32 = 3;

/// Named point in the build pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Graph as built from the data source.
    Raw,
    /// Raw graph plus production attributes.
    Enriched,
    /// Enriched graph with isolated systems removed.
    Standard,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 3] = [Stage::Raw, Stage::Enriched, Stage::Standard];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Raw => "raw",
            Stage::Enriched => "enriched",
            Stage::Standard => "standard",
        }
    }

    /// Stage whose snapshot this stage is produced from.
    pub fn previous(self) -> Option<Stage> {
        match self {
            Stage::Raw => None,
            Stage::Enriched => Some(Stage::Raw),
            Stage::Standard => Some(Stage::Enriched),
        }
    }

    fn tag(self) -> u8 {
        match self {
            Stage::Raw => 0,
            Stage::Enriched => 1,
            Stage::Standard => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown stage '{value}' (expected raw, enriched or standard)"))
    }
}

/// Key-value store of stage snapshots.
pub trait StageCache {
    /// Restore a stage. Missing or unreadable entries yield `None`.
    fn load(&self, stage: Stage) -> Option<Starmap>;

    /// Replace the entry for a stage. Readers never observe a partial write.
    fn store(&self, stage: Stage, starmap: &Starmap) -> Result<()>;

    /// Whether an entry exists for the stage, without decoding it.
    fn contains(&self, stage: Stage) -> bool;
}

impl<T: StageCache + ?Sized> StageCache for &T {
    fn load(&self, stage: Stage) -> Option<Starmap> {
        (**self).load(stage)
    }

    fn store(&self, stage: Stage, starmap: &Starmap) -> Result<()> {
        (**self).store(stage, starmap)
    }

    fn contains(&self, stage: Stage) -> bool {
        (**self).contains(stage)
    }
}

/// Directory-backed stage cache with one file per stage.
#[derive(Debug, Clone)]
pub struct FileStageCache {
    dir: PathBuf,
}

impl FileStageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the snapshot for a stage.
    pub fn stage_path(&self, stage: Stage) -> PathBuf {
        self.dir.join(format!("eemap_cache_{}.bin", stage.name()))
    }

    /// Delete every stage file. Missing files are ignored.
    pub fn clear(&self) -> Result<()> {
        for stage in Stage::ALL {
            match fs::remove_file(self.stage_path(stage)) {
                Ok(()) => debug!(stage = %stage, "removed stage snapshot"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

impl StageCache for FileStageCache {
    fn load(&self, stage: Stage) -> Option<Starmap> {
        let path = self.stage_path(stage);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(stage = %stage, path = %path.display(), error = %err, "no cached stage");
                return None;
            }
        };

        match decode_stage(stage, &bytes) {
            Ok(starmap) => {
                info!(
                    stage = %stage,
                    systems = starmap.node_count(),
                    edges = starmap.edge_count(),
                    "loaded cached stage"
                );
                Some(starmap)
            }
            Err(message) => {
                warn!(
                    stage = %stage,
                    path = %path.display(),
                    error = %message,
                    "failed to load cached stage, will rebuild"
                );
                None
            }
        }
    }

    fn store(&self, stage: Stage, starmap: &Starmap) -> Result<()> {
        let bytes = encode_stage(stage, starmap)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.stage_path(stage);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|err| err.error)?;

        info!(
            stage = %stage,
            path = %path.display(),
            file_size = bytes.len(),
            "stored stage snapshot"
        );
        Ok(())
    }

    fn contains(&self, stage: Stage) -> bool {
        self.stage_path(stage).is_file()
    }
}

/// In-memory stage cache holding encoded snapshots.
#[derive(Debug, Default)]
pub struct MemoryStageCache {
    entries: RwLock<HashMap<Stage, Vec<u8>>>,
}

impl MemoryStageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the raw bytes of an entry.
    pub fn insert_raw(&self, stage: Stage, bytes: Vec<u8>) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(stage, bytes);
    }

    pub fn remove(&self, stage: Stage) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&stage);
    }
}

impl StageCache for MemoryStageCache {
    fn load(&self, stage: Stage) -> Option<Starmap> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let bytes = entries.get(&stage)?;
        match decode_stage(stage, bytes) {
            Ok(starmap) => Some(starmap),
            Err(message) => {
                warn!(stage = %stage, error = %message, "discarding unreadable cached stage");
                None
            }
        }
    }

    fn store(&self, stage: Stage, starmap: &Starmap) -> Result<()> {
        let bytes = encode_stage(stage, starmap)?;
        self.insert_raw(stage, bytes);
        Ok(())
    }

    fn contains(&self, stage: Stage) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(&stage)
    }
}

/// Encode a starmap into the snapshot format.
pub fn encode_stage(stage: Stage, starmap: &Starmap) -> Result<Vec<u8>> {
    let encode_error = |message: String| Error::CacheEncode {
        stage: stage.name().to_string(),
        message,
    };

    let serialized = postcard::to_allocvec(starmap)
        .map_err(|e| encode_error(format!("postcard serialization failed: {}", e)))?;
    let compressed = zstd::encode_all(serialized.as_slice(), COMPRESSION_LEVEL)
        .map_err(|e| encode_error(format!("zstd compression failed: {}", e)))?;
    let checksum = Sha256::digest(&compressed);

    let node_count = u32::try_from(starmap.node_count())
        .map_err(|_| encode_error("too many systems for snapshot header".to_string()))?;
    let edge_count = u32::try_from(starmap.edge_count())
        .map_err(|_| encode_error("too many edges for snapshot header".to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_SIZE + compressed.len() + CHECKSUM_SIZE);
    bytes.extend_from_slice(CACHE_MAGIC);
    bytes.push(CACHE_VERSION);
    bytes.push(stage.tag());
    bytes.extend_from_slice(&[0, 0]);
    bytes.extend_from_slice(&node_count.to_le_bytes());
    bytes.extend_from_slice(&edge_count.to_le_bytes());
    bytes.extend_from_slice(&compressed);
    bytes.extend_from_slice(&checksum);
    Ok(bytes)
}

/// Decode a snapshot, validating header, checksum and counts.
pub fn decode_stage(stage: Stage, bytes: &[u8]) -> std::result::Result<Starmap, String> {
    if bytes.len() < HEADER_SIZE + CHECKSUM_SIZE {
        return Err(format!("snapshot truncated ({} bytes)", bytes.len()));
    }

    let (header, rest) = bytes.split_at(HEADER_SIZE);
    if &header[0..4] != CACHE_MAGIC {
        return Err("invalid magic bytes".to_string());
    }
    if header[4] != CACHE_VERSION {
        return Err(format!(
            "unsupported version {} (expected {})",
            header[4], CACHE_VERSION
        ));
    }
    if header[5] != stage.tag() {
        return Err(format!("snapshot was written for another stage (tag {})", header[5]));
    }
    let node_count = read_u32(&header[8..12]) as usize;
    let edge_count = read_u32(&header[12..16]) as usize;

    let (compressed, stored_checksum) = rest.split_at(rest.len() - CHECKSUM_SIZE);
    let computed_checksum = Sha256::digest(compressed);
    if computed_checksum.as_slice() != stored_checksum {
        return Err("checksum mismatch - file may be corrupted".to_string());
    }

    let decompressed = zstd::decode_all(compressed)
        .map_err(|e| format!("zstd decompression failed: {}", e))?;
    let starmap: Starmap = postcard::from_bytes(&decompressed)
        .map_err(|e| format!("postcard deserialization failed: {}", e))?;

    if starmap.node_count() != node_count || starmap.edge_count() != edge_count {
        return Err(format!(
            "count mismatch: header {node_count} systems/{edge_count} edges, body {} systems/{} edges",
            starmap.node_count(),
            starmap.edge_count()
        ));
    }

    Ok(starmap)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::triangle_starmap;

    #[test]
    fn stage_names_parse_case_insensitively() {
        assert_eq!("RAW".parse::<Stage>(), Ok(Stage::Raw));
        assert_eq!("standard".parse::<Stage>(), Ok(Stage::Standard));
        assert!("pruned".parse::<Stage>().is_err());
    }

    #[test]
    fn encoded_snapshot_decodes_to_same_graph() {
        let starmap = triangle_starmap();
        let bytes = encode_stage(Stage::Raw, &starmap).expect("encode");
        let restored = decode_stage(Stage::Raw, &bytes).expect("decode");
        assert_eq!(restored, starmap);
    }

    #[test]
    fn flipped_byte_is_rejected() {
        let starmap = triangle_starmap();
        let mut bytes = encode_stage(Stage::Raw, &starmap).expect("encode");
        let middle = HEADER_SIZE + 1;
        bytes[middle] ^= 0xFF;
        let err = decode_stage(Stage::Raw, &bytes).expect_err("corrupt body");
        assert!(err.contains("checksum"));
    }

    #[test]
    fn snapshot_for_another_stage_is_rejected() {
        let bytes = encode_stage(Stage::Raw, &triangle_starmap()).expect("encode");
        assert!(decode_stage(Stage::Standard, &bytes).is_err());
    }

    #[test]
    fn memory_cache_treats_garbage_as_miss() {
        let cache = MemoryStageCache::new();
        cache.insert_raw(Stage::Enriched, b"not a snapshot".to_vec());
        assert!(cache.contains(Stage::Enriched));
        assert!(cache.load(Stage::Enriched).is_none());
    }
}
