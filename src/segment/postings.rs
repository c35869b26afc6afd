//! Postings format with block-based compression
//!
//! A posting list is a vbyte document count followed by blocks of up to
//! `BLOCK_SIZE` postings. Each block stores a vbyte length, bitpacked doc id
//! deltas and bitpacked term frequencies. Doc ids within a list are strictly
//! increasing, so deltas are always positive after the first posting.

use std::io;

use super::types::{Posting, PostingListMeta, BLOCK_SIZE};

/// Variable-byte encoding for integers
pub fn encode_vbyte(value: u32, output: &mut Vec<u8>) {
    let mut v = value;
    loop {
        let byte = (v & 0x7F) as u8;
        v >>= 7;
        if v == 0 {
            // high bit marks the last byte
            output.push(byte | 0x80);
            return;
        }
        output.push(byte);
    }
}

/// Decode a variable-byte encoded integer
pub fn decode_vbyte(input: &[u8], pos: &mut usize) -> io::Result<u32> {
    let mut result: u32 = 0;
    let mut shift = 0;

    loop {
        let byte = *input.get(*pos).ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "unexpected end of vbyte")
        })?;
        *pos += 1;

        result |= ((byte & 0x7F) as u32) << shift;
        if byte & 0x80 != 0 {
            return Ok(result);
        }

        shift += 7;
        if shift > 28 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "vbyte value too large",
            ));
        }
    }
}

/// Pack integers with the minimum bit width needed for the largest value
pub fn bitpack_encode(values: &[u32], output: &mut Vec<u8>) {
    let max_val = values.iter().copied().max().unwrap_or(0);
    let width = (32 - max_val.leading_zeros()).max(1);
    output.push(width as u8);

    let mut acc: u64 = 0;
    let mut bits = 0u32;
    for &value in values {
        acc |= (value as u64) << bits;
        bits += width;
        while bits >= 8 {
            output.push(acc as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        output.push(acc as u8);
    }
}

/// Unpack `count` integers written by [`bitpack_encode`]
pub fn bitpack_decode(input: &[u8], pos: &mut usize, count: usize) -> io::Result<Vec<u32>> {
    let width = *input.get(*pos).ok_or_else(|| {
        io::Error::new(io::ErrorKind::UnexpectedEof, "unexpected end of bitpack")
    })? as u32;
    *pos += 1;

    if width == 0 || width > 32 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid bitpack width {}", width),
        ));
    }

    let byte_len = (count * width as usize + 7) / 8;
    let bytes = input.get(*pos..*pos + byte_len).ok_or_else(|| {
        io::Error::new(io::ErrorKind::UnexpectedEof, "not enough bytes for bitpack")
    })?;
    *pos += byte_len;

    let mask = (1u64 << width) - 1;
    let mut values = Vec::with_capacity(count);
    let mut acc: u64 = 0;
    let mut bits = 0u32;
    let mut bytes = bytes.iter();
    for _ in 0..count {
        while bits < width {
            // byte_len guarantees enough input for `count` values
            acc |= (*bytes.next().unwrap_or(&0) as u64) << bits;
            bits += 8;
        }
        values.push((acc & mask) as u32);
        acc >>= width;
        bits -= width;
    }

    Ok(values)
}

/// Writer for posting lists
///
/// All posting lists of a segment are appended to one contiguous buffer;
/// each list is addressed by the [`PostingListMeta`] returned from
/// [`PostingsWriter::write_posting_list`].
#[derive(Default)]
pub struct PostingsWriter {
    data: Vec<u8>,
}

impl PostingsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a posting list; postings must be sorted by doc id
    pub fn write_posting_list(&mut self, postings: &[Posting]) -> PostingListMeta {
        let offset = self.data.len() as u64;
        encode_vbyte(postings.len() as u32, &mut self.data);

        let mut prev = 0u32;
        let mut total_term_frequency = 0u64;
        for block in postings.chunks(BLOCK_SIZE) {
            encode_vbyte(block.len() as u32, &mut self.data);

            let mut deltas = Vec::with_capacity(block.len());
            let mut tfs = Vec::with_capacity(block.len());
            for posting in block {
                deltas.push(posting.doc_id - prev);
                prev = posting.doc_id;
                tfs.push(posting.term_frequency);
                total_term_frequency += posting.term_frequency as u64;
            }
            bitpack_encode(&deltas, &mut self.data);
            bitpack_encode(&tfs, &mut self.data);
        }

        PostingListMeta {
            offset,
            length: self.data.len() as u64 - offset,
            doc_frequency: postings.len() as u32,
            total_term_frequency,
        }
    }

    /// Take the data (consuming the writer)
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Reader for posting lists
pub struct PostingsReader {
    data: Vec<u8>,
}

impl PostingsReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Decode the posting list described by `meta`
    pub fn get_postings(&self, meta: &PostingListMeta) -> io::Result<Vec<Posting>> {
        let start = meta.offset as usize;
        let end = (meta.offset + meta.length) as usize;
        let bytes = self.data.get(start..end).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "posting list extends beyond data",
            )
        })?;
        decode_posting_list(bytes)
    }
}

fn decode_posting_list(bytes: &[u8]) -> io::Result<Vec<Posting>> {
    let mut pos = 0;
    let total = decode_vbyte(bytes, &mut pos)? as usize;
    let mut postings = Vec::with_capacity(total);

    let mut prev = 0u32;
    while postings.len() < total {
        let len = decode_vbyte(bytes, &mut pos)? as usize;
        if len == 0 || len > BLOCK_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid postings block length {}", len),
            ));
        }
        let deltas = bitpack_decode(bytes, &mut pos, len)?;
        let tfs = bitpack_decode(bytes, &mut pos, len)?;
        for (delta, tf) in deltas.into_iter().zip(tfs) {
            prev += delta;
            postings.push(Posting::new(prev, tf));
        }
    }

    Ok(postings)
}
