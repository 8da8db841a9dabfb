//! Byte-counting request bodies for upload progress.
//!
//! The whole blob is already in memory; it is streamed to the transport in
//! chunks so progress can be observed on the sending leg, the way an XHR
//! `upload.progress` event reports bytes handed to the network stack.

use crate::progress::ProgressFn;
use bytes::Bytes;
use futures::StreamExt;

const CHUNK_SIZE: usize = 64 * 1024;

/// Split a blob into cheap reference-counted chunks.
fn chunk_bytes(data: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    let mut chunks = Vec::with_capacity(data.len().div_ceil(chunk_size).max(1));
    let mut offset = 0;
    while offset < data.len() {
        let end = usize::min(offset + chunk_size, data.len());
        chunks.push(data.slice(offset..end));
        offset = end;
    }
    chunks
}

/// Percent of `total` transferred after `sent` bytes, rounded.
fn percent_of(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent as f64 / total as f64) * 100.0).round() as u8
}

/// Wrap a blob into a request body that reports percent progress as chunks
/// are pulled by the transport.
pub(crate) fn progress_body(data: Bytes, progress: Option<ProgressFn>) -> reqwest::Body {
    let total = data.len() as u64;
    let chunks = chunk_bytes(&data, CHUNK_SIZE);

    let mut sent: u64 = 0;
    let stream = futures::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        if let Some(ref progress) = progress {
            progress(percent_of(sent, total));
        }
        Ok::<Bytes, std::convert::Infallible>(chunk)
    });

    reqwest::Body::wrap_stream(stream)
}
