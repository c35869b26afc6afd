//! Index lifecycle: create/open, single writer, committed snapshots
//!
//! `Index` owns the directory and the currently published snapshot.
//! `IndexWriter` owns a pending batch and the exclusive write guard.
//! `IndexReader` is a cheap handle on one immutable snapshot; it keeps
//! serving that snapshot after later commits until a new reader is taken.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::buffer::PendingBatch;
use super::manifest::IndexManifest;
use super::reader::SegmentReader;
use super::store::SegmentStore;
use super::types::Generation;
use super::writer::SegmentWriter;
use crate::config::IndexSettings;
use crate::error::{QuizdexError, Result};
use crate::models::{DocId, Document, SearchHit};
use crate::tokenizer::Tokenizer;

/// One committed generation together with the analysis settings it was built with
pub struct Snapshot {
    segment: SegmentReader,
    settings: IndexSettings,
    tokenizer: Tokenizer,
}

impl Snapshot {
    fn new(segment: SegmentReader, settings: IndexSettings) -> Self {
        let tokenizer = Tokenizer::new(&settings.tokenizer_config);
        Self {
            segment,
            settings,
            tokenizer,
        }
    }
}

/// Read-only handle on a committed snapshot
#[derive(Clone)]
pub struct IndexReader {
    snapshot: Arc<Snapshot>,
}

impl IndexReader {
    pub fn generation(&self) -> Generation {
        self.snapshot.segment.generation()
    }

    pub fn num_docs(&self) -> u32 {
        self.snapshot.segment.doc_count()
    }

    pub fn num_terms(&self) -> usize {
        self.snapshot.segment.term_count()
    }

    pub fn avg_doc_len(&self) -> f64 {
        self.snapshot.segment.stats().avgdl()
    }

    pub fn doc_frequency(&self, term: &str) -> u32 {
        self.snapshot.segment.doc_frequency(term)
    }

    pub fn title(&self, doc_id: DocId) -> Option<&str> {
        self.snapshot.segment.title(doc_id)
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.snapshot.settings
    }

    /// The analyzer queries must go through for this snapshot
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.snapshot.tokenizer
    }

    pub fn segment(&self) -> &SegmentReader {
        &self.snapshot.segment
    }

    /// Ranked search with default options; see [`crate::query::search`]
    pub fn search(&self, query_text: &str, limit: usize) -> Result<Vec<SearchHit>> {
        crate::query::search(self, query_text, limit)
    }
}

/// An inverted index, in memory or backed by a directory
pub struct Index {
    settings: IndexSettings,
    store: Option<SegmentStore>,
    snapshot: ArcSwapOption<Snapshot>,
    writer_lock: Mutex<()>,
}

impl Index {
    /// Create a new, empty index in `dir`, discarding any index already there
    pub fn create<P: AsRef<Path>>(dir: P, settings: IndexSettings) -> Result<Self> {
        let store = SegmentStore::new(dir)?;
        store.clear()?;
        info!(dir = %store.base_dir().display(), "created index");

        Ok(Self {
            settings,
            store: Some(store),
            snapshot: ArcSwapOption::empty(),
            writer_lock: Mutex::new(()),
        })
    }

    /// Open the committed index in `dir`
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(QuizdexError::IndexState(format!(
                "index directory {} does not exist",
                dir.display()
            )));
        }

        let store = SegmentStore::new(dir)?;
        let manifest = store.load_manifest()?.ok_or_else(|| {
            QuizdexError::IndexState(format!("no committed index in {}", dir.display()))
        })?;
        let segment = store.read_segment(&manifest)?;
        info!(
            dir = %dir.display(),
            generation = manifest.generation().0,
            docs = manifest.doc_count(),
            "opened index"
        );

        let settings = manifest.settings.clone();
        Ok(Self {
            snapshot: ArcSwapOption::from_pointee(Snapshot::new(segment, settings.clone())),
            settings,
            store: Some(store),
            writer_lock: Mutex::new(()),
        })
    }

    /// Create an index that lives only in memory
    pub fn in_memory(settings: IndexSettings) -> Self {
        Self {
            settings,
            store: None,
            snapshot: ArcSwapOption::empty(),
            writer_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    pub fn directory(&self) -> Option<&Path> {
        self.store.as_ref().map(|s| s.base_dir())
    }

    /// Live generation, if anything has been committed
    pub fn generation(&self) -> Option<Generation> {
        self.snapshot.load_full().map(|s| s.segment.generation())
    }

    /// Acquire the exclusive write handle
    ///
    /// Fails with `IndexState` while another writer on this index is alive.
    /// The writer starts from an empty batch; committing it replaces the
    /// current generation.
    pub fn writer(&self) -> Result<IndexWriter<'_>> {
        let guard = self.writer_lock.try_lock().ok_or_else(|| {
            QuizdexError::IndexState("another writer is already open on this index".to_string())
        })?;

        Ok(IndexWriter {
            index: self,
            tokenizer: Tokenizer::new(&self.settings.tokenizer_config),
            batch: PendingBatch::new(),
            _guard: guard,
        })
    }

    /// Read-only snapshot of the most recent commit
    pub fn reader(&self) -> Result<IndexReader> {
        self.snapshot
            .load_full()
            .map(|snapshot| IndexReader { snapshot })
            .ok_or_else(|| {
                QuizdexError::IndexState("index has no committed generation yet".to_string())
            })
    }

    /// Pick up a generation committed through another handle on the same directory
    ///
    /// Returns the live generation after the reload. Readers obtained earlier
    /// keep their snapshot.
    pub fn reload(&self) -> Result<Option<Generation>> {
        let Some(store) = &self.store else {
            return Ok(self.generation());
        };
        let Some(manifest) = store.load_manifest()? else {
            return Ok(self.generation());
        };

        if self.generation() != Some(manifest.generation()) {
            let segment = store.read_segment(&manifest)?;
            self.snapshot.store(Some(Arc::new(Snapshot::new(
                segment,
                manifest.settings.clone(),
            ))));
            debug!(generation = manifest.generation().0, "reloaded index");
        }
        Ok(Some(manifest.generation()))
    }

    fn next_generation(&self) -> Result<Generation> {
        let mut latest = self.generation();
        if let Some(store) = &self.store {
            latest = latest.max(store.list_generations()?.last().copied());
            latest = latest.max(store.load_manifest()?.map(|m| m.generation()));
        }
        Ok(latest.map(|g| g.next()).unwrap_or(Generation::FIRST))
    }

    fn publish(&self, batch: &PendingBatch) -> Result<Generation> {
        let generation = self.next_generation()?;
        let result = SegmentWriter::new(generation).write_from_buffer(batch)?;

        if let Some(store) = &self.store {
            store.write_segment(&result)?;
            let manifest = IndexManifest::new(
                result.reader.meta().clone(),
                result.checksum(),
                self.settings.clone(),
            );
            store.save_manifest(&manifest)?;
        }

        let terms = result.reader.term_count();
        let bytes = result.size_bytes();
        self.snapshot.store(Some(Arc::new(Snapshot::new(
            result.reader,
            self.settings.clone(),
        ))));

        if let Some(store) = &self.store {
            if let Err(e) = store.remove_stale_generations(generation) {
                warn!(error = %e, "failed to remove stale generations");
            }
        }

        info!(
            generation = generation.0,
            docs = batch.doc_count(),
            terms,
            bytes,
            "committed index"
        );
        Ok(generation)
    }
}

/// Exclusive, single-use write handle
pub struct IndexWriter<'a> {
    index: &'a Index,
    tokenizer: Tokenizer,
    batch: PendingBatch,
    _guard: MutexGuard<'a, ()>,
}

impl IndexWriter<'_> {
    /// Analyze `content` and add the document to the pending batch
    ///
    /// The title is stored verbatim and must not be blank. Empty content is
    /// accepted and yields a zero-length document that no query matches.
    pub fn add_document(&mut self, title: &str, content: &str) -> Result<DocId> {
        if title.trim().is_empty() {
            return Err(QuizdexError::Validation(format!(
                "document {} has an empty title",
                self.batch.doc_count()
            )));
        }
        if self.batch.doc_count() == DocId::MAX {
            return Err(QuizdexError::Validation(
                "batch exceeds the maximum number of documents".to_string(),
            ));
        }

        let term_frequencies = self.tokenizer.compute_term_frequencies(content);
        let doc_len: u64 = term_frequencies.values().map(|&tf| tf as u64).sum();
        let doc_len = u32::try_from(doc_len).map_err(|_| {
            QuizdexError::Validation(format!("document {:?} has too many tokens", title))
        })?;

        Ok(self
            .batch
            .index_document(title.to_string(), term_frequencies, doc_len))
    }

    pub fn add(&mut self, document: &Document) -> Result<DocId> {
        self.add_document(&document.title, &document.content)
    }

    /// Number of documents added so far
    pub fn pending_docs(&self) -> u32 {
        self.batch.doc_count()
    }

    /// Atomically publish the batch as the index's new generation
    pub fn commit(self) -> Result<Generation> {
        self.index.publish(&self.batch)
    }

    /// Discard the pending batch
    pub fn rollback(self) {
        debug!(docs = self.batch.doc_count(), "rolled back pending batch");
    }
}
