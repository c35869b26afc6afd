//! Index manifest naming the live generation
//!
//! Commit protocol:
//! 1. Write the new generation's segment files → fsync
//! 2. Write index.manifest.tmp → fsync
//! 3. Atomic rename to index.manifest → fsync directory
//! 4. Only then publish the new snapshot to in-process readers

use serde::{Deserialize, Serialize};

use super::reader::SegmentMeta;
use super::types::Generation;
use crate::config::IndexSettings;
use crate::error::{QuizdexError, Result};

/// The manifest of a committed index
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    /// Manifest version (for format upgrades)
    pub version: u32,
    /// Live segment
    pub segment: SegmentMeta,
    /// CRC32 of the live segment's files
    pub checksum: u64,
    /// Settings the generation was built with
    pub settings: IndexSettings,
}

impl IndexManifest {
    /// Current manifest format version
    pub const VERSION: u32 = 1;

    pub fn new(segment: SegmentMeta, checksum: u64, settings: IndexSettings) -> Self {
        Self {
            version: Self::VERSION,
            segment,
            checksum,
            settings,
        }
    }

    pub fn generation(&self) -> Generation {
        self.segment.generation
    }

    pub fn doc_count(&self) -> u32 {
        self.segment.doc_count
    }

    /// Serialize the manifest to JSON
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Deserialize and version-check a manifest
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let manifest: Self = serde_json::from_slice(data)?;
        if manifest.version > Self::VERSION {
            return Err(QuizdexError::CorruptIndex(format!(
                "manifest version {} is newer than supported version {}",
                manifest.version,
                Self::VERSION
            )));
        }
        Ok(manifest)
    }
}
