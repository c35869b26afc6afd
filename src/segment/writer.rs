//! Segment writer: turns a pending batch into an immutable segment
//!
//! Produces the postings, term dictionary, term metadata and stored-field
//! payloads plus the in-memory reader built from exactly those bytes.

use std::io;

use crc32fast::Hasher;

use super::buffer::PendingBatch;
use super::docstore::StoredFields;
use super::postings::{PostingsReader, PostingsWriter};
use super::reader::{SegmentMeta, SegmentReader};
use super::term_dict::TermDictionaryBuilder;
use super::types::Generation;

/// Result of writing a segment
pub struct SegmentWriteResult {
    pub reader: SegmentReader,
    pub postings_data: Vec<u8>,
    pub fst_data: Vec<u8>,
    /// bincode-encoded `Vec<PostingListMeta>`
    pub term_meta_data: Vec<u8>,
    /// bincode-encoded [`StoredFields`]
    pub docs_data: Vec<u8>,
}

impl SegmentWriteResult {
    /// CRC32 over every persisted artifact, in file order
    pub fn checksum(&self) -> u64 {
        segment_checksum(
            &self.fst_data,
            &self.term_meta_data,
            &self.postings_data,
            &self.docs_data,
        )
    }

    pub fn size_bytes(&self) -> u64 {
        (self.postings_data.len()
            + self.fst_data.len()
            + self.term_meta_data.len()
            + self.docs_data.len()) as u64
    }
}

/// Checksum shared by the write path and the verification on open
pub fn segment_checksum(fst: &[u8], term_meta: &[u8], postings: &[u8], docs: &[u8]) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(fst);
    hasher.update(term_meta);
    hasher.update(postings);
    hasher.update(docs);
    hasher.finalize() as u64
}

/// Writer for creating a generation's segment from a pending batch
pub struct SegmentWriter {
    generation: Generation,
}

impl SegmentWriter {
    pub fn new(generation: Generation) -> Self {
        Self { generation }
    }

    pub fn write_from_buffer(&self, batch: &PendingBatch) -> io::Result<SegmentWriteResult> {
        // Sorted term order keeps the postings file layout deterministic
        let mut terms: Vec<&String> = batch.all_postings().keys().collect();
        terms.sort();

        let mut postings_writer = PostingsWriter::new();
        let mut term_builder = TermDictionaryBuilder::with_capacity(terms.len());

        for term in terms {
            if let Some(postings) = batch.get_postings(term) {
                let meta = postings_writer.write_posting_list(postings);
                term_builder.add(term.clone(), meta);
            }
        }

        let postings_data = postings_writer.into_data();
        let term_dict = term_builder.build()?;

        let fst_data = term_dict.fst_bytes().to_vec();
        let term_meta_data = bincode::serialize(term_dict.metadata())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let docs_data = StoredFields::new(batch.titles().to_vec(), batch.stats())
            .to_bytes()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let meta = SegmentMeta {
            generation: self.generation,
            doc_count: batch.doc_count(),
            term_count: term_dict.len() as u32,
            size_bytes: (postings_data.len()
                + fst_data.len()
                + term_meta_data.len()
                + docs_data.len()) as u64,
            created_at: current_timestamp(),
        };

        let reader = SegmentReader::from_memory(
            meta,
            term_dict,
            PostingsReader::new(postings_data.clone()),
            batch.stats().clone(),
            batch.titles().to_vec(),
        )?;

        Ok(SegmentWriteResult {
            reader,
            postings_data,
            fst_data,
            term_meta_data,
            docs_data,
        })
    }
}

/// Current Unix timestamp in seconds
pub(crate) fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
