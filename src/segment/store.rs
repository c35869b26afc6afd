use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{QuizdexError, Result};
use crate::segment::docstore::StoredFields;
use crate::segment::manifest::IndexManifest;
use crate::segment::postings::PostingsReader;
use crate::segment::reader::SegmentReader;
use crate::segment::term_dict::TermDictionary;
use crate::segment::types::{Generation, PostingListMeta};
use crate::segment::writer::{segment_checksum, SegmentWriteResult};

const MANIFEST_FILE: &str = "index.manifest";
const MANIFEST_TMP_FILE: &str = "index.manifest.tmp";
const FST_FILE: &str = "terms.fst";
const TERM_META_FILE: &str = "term_meta.bin";
const POSTINGS_FILE: &str = "postings.bin";
const DOCS_FILE: &str = "docs.bin";

/// Persistent storage for generation directories and the manifest.
pub struct SegmentStore {
    base_dir: PathBuf,
}

impl SegmentStore {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> io::Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn generation_dir(&self, generation: Generation) -> PathBuf {
        self.base_dir.join(generation.dir_name())
    }

    /// Remove every index artifact in the directory, leaving unrelated files alone
    pub fn clear(&self) -> io::Result<()> {
        for name in [MANIFEST_FILE, MANIFEST_TMP_FILE] {
            let path = self.base_dir.join(name);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        for generation in self.list_generations()? {
            fs::remove_dir_all(self.generation_dir(generation))?;
        }
        sync_dir(&self.base_dir)
    }

    /// Generations present on disk, live or not, in ascending order
    pub fn list_generations(&self) -> io::Result<Vec<Generation>> {
        let mut generations = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(generation) = entry.file_name().to_str().and_then(Generation::from_dir_name)
            {
                generations.push(generation);
            }
        }
        generations.sort();
        Ok(generations)
    }

    /// Write and fsync all files of a segment
    pub fn write_segment(&self, result: &SegmentWriteResult) -> io::Result<()> {
        let dir = self.generation_dir(result.reader.generation());
        if dir.exists() {
            // leftover from an interrupted commit that never reached the manifest
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;

        write_synced(&dir.join(FST_FILE), &result.fst_data)?;
        write_synced(&dir.join(TERM_META_FILE), &result.term_meta_data)?;
        write_synced(&dir.join(POSTINGS_FILE), &result.postings_data)?;
        write_synced(&dir.join(DOCS_FILE), &result.docs_data)?;
        sync_dir(&dir)?;
        sync_dir(&self.base_dir)
    }

    /// Load the segment named by `manifest`, verifying its checksum
    pub fn read_segment(&self, manifest: &IndexManifest) -> Result<SegmentReader> {
        let dir = self.generation_dir(manifest.generation());
        let fst_data = read_segment_file(&dir, FST_FILE)?;
        let term_meta_data = read_segment_file(&dir, TERM_META_FILE)?;
        let postings_data = read_segment_file(&dir, POSTINGS_FILE)?;
        let docs_data = read_segment_file(&dir, DOCS_FILE)?;

        let checksum = segment_checksum(&fst_data, &term_meta_data, &postings_data, &docs_data);
        if checksum != manifest.checksum {
            return Err(QuizdexError::CorruptIndex(format!(
                "checksum mismatch for {}: manifest {:#x}, files {:#x}",
                manifest.generation(),
                manifest.checksum,
                checksum
            )));
        }

        let term_meta: Vec<PostingListMeta> = bincode::deserialize(&term_meta_data)?;
        let terms = TermDictionary::new(fst_data, term_meta).map_err(corrupt)?;
        let (titles, stats) = StoredFields::from_bytes(&docs_data)?.into_parts();

        SegmentReader::from_memory(
            manifest.segment.clone(),
            terms,
            PostingsReader::new(postings_data),
            stats,
            titles,
        )
        .map_err(corrupt)
    }

    /// Atomically replace the manifest (write tmp, fsync, rename, fsync dir)
    pub fn save_manifest(&self, manifest: &IndexManifest) -> Result<()> {
        let bytes = manifest.to_json()?;
        let tmp = self.base_dir.join(MANIFEST_TMP_FILE);
        write_synced(&tmp, &bytes)?;
        fs::rename(&tmp, self.base_dir.join(MANIFEST_FILE))?;
        sync_dir(&self.base_dir)?;
        Ok(())
    }

    /// Load the manifest, or `None` if nothing has been committed
    pub fn load_manifest(&self) -> Result<Option<IndexManifest>> {
        let path = self.base_dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path)?;
        IndexManifest::from_json(&bytes).map(Some)
    }

    /// Delete generation directories other than `live`
    pub fn remove_stale_generations(&self, live: Generation) -> io::Result<usize> {
        let mut removed = 0;
        for generation in self.list_generations()? {
            if generation != live {
                fs::remove_dir_all(self.generation_dir(generation))?;
                debug!(%generation, "removed stale generation");
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// A file the manifest promises but that is absent means the index is damaged
fn read_segment_file(dir: &Path, name: &str) -> Result<Vec<u8>> {
    let path = dir.join(name);
    fs::read(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            QuizdexError::CorruptIndex(format!("missing segment file {}", path.display()))
        }
        _ => QuizdexError::Io(e),
    })
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

fn corrupt(err: io::Error) -> QuizdexError {
    QuizdexError::CorruptIndex(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexSettings;
    use crate::segment::buffer::PendingBatch;
    use crate::segment::writer::SegmentWriter;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write_generation(store: &SegmentStore, generation: Generation) -> IndexManifest {
        let mut batch = PendingBatch::new();
        let mut tf = HashMap::new();
        tf.insert("paris".to_string(), 1);
        batch.index_document("Paris".into(), tf, 1);

        let result = SegmentWriter::new(generation).write_from_buffer(&batch).unwrap();
        store.write_segment(&result).unwrap();
        IndexManifest::new(
            result.reader.meta().clone(),
            result.checksum(),
            IndexSettings::default(),
        )
    }

    #[test]
    fn test_manifest_absent_then_saved() {
        let tmp = TempDir::new().unwrap();
        let store = SegmentStore::new(tmp.path()).unwrap();
        assert!(store.load_manifest().unwrap().is_none());

        let manifest = write_generation(&store, Generation::FIRST);
        store.save_manifest(&manifest).unwrap();

        assert_eq!(store.load_manifest().unwrap(), Some(manifest));
        assert!(!tmp.path().join(MANIFEST_TMP_FILE).exists());
    }

    #[test]
    fn test_read_segment_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = SegmentStore::new(tmp.path()).unwrap();
        let manifest = write_generation(&store, Generation::FIRST);

        let reader = store.read_segment(&manifest).unwrap();
        assert_eq!(reader.doc_count(), 1);
        assert_eq!(reader.title(0), Some("Paris"));
        assert_eq!(reader.doc_frequency("paris"), 1);
    }

    #[test]
    fn test_checksum_mismatch_is_corruption() {
        let tmp = TempDir::new().unwrap();
        let store = SegmentStore::new(tmp.path()).unwrap();
        let manifest = write_generation(&store, Generation::FIRST);

        let docs = tmp
            .path()
            .join(Generation::FIRST.dir_name())
            .join(DOCS_FILE);
        let mut bytes = fs::read(&docs).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        fs::write(&docs, bytes).unwrap();

        let err = store.read_segment(&manifest).err().unwrap();
        assert!(matches!(err, QuizdexError::CorruptIndex(_)));
    }

    #[test]
    fn test_missing_segment_files_are_corruption() {
        let tmp = TempDir::new().unwrap();
        let store = SegmentStore::new(tmp.path()).unwrap();
        let manifest = write_generation(&store, Generation::FIRST);
        let dir = tmp.path().join(Generation::FIRST.dir_name());

        fs::remove_file(dir.join(TERM_META_FILE)).unwrap();
        let err = store.read_segment(&manifest).err().unwrap();
        assert!(matches!(err, QuizdexError::CorruptIndex(_)));

        fs::remove_dir_all(&dir).unwrap();
        let err = store.read_segment(&manifest).err().unwrap();
        assert!(matches!(err, QuizdexError::CorruptIndex(_)));
    }

    #[test]
    fn test_stale_generations_and_clear() {
        let tmp = TempDir::new().unwrap();
        let store = SegmentStore::new(tmp.path()).unwrap();
        write_generation(&store, Generation::new(1));
        write_generation(&store, Generation::new(2));
        let live = write_generation(&store, Generation::new(3));
        store.save_manifest(&live).unwrap();
        fs::write(tmp.path().join("notes.txt"), "keep me").unwrap();

        assert_eq!(store.list_generations().unwrap().len(), 3);
        assert_eq!(store.remove_stale_generations(Generation::new(3)).unwrap(), 2);
        assert_eq!(store.list_generations().unwrap(), vec![Generation::new(3)]);

        store.clear().unwrap();
        assert!(store.list_generations().unwrap().is_empty());
        assert!(store.load_manifest().unwrap().is_none());
        assert!(tmp.path().join("notes.txt").exists());
    }
}
