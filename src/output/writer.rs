//! JSON array writer
//!
//! Frames a stream of entities as one JSON array, emitted chunk by chunk.

use crate::error::Result;
use async_stream::try_stream;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;
use tracing::{debug, error};

/// Incremental JSON array framing
#[derive(Debug, Default)]
pub struct JsonArrayWriter {
    written: usize,
}

impl JsonArrayWriter {
    /// Create a new writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Opening bracket
    pub fn open(&self) -> Bytes {
        Bytes::from_static(b"[")
    }

    /// Serialize one entity, preceded by a comma unless it is the first
    pub fn entity(&mut self, entity: &Value) -> Result<Bytes> {
        let mut buf = Vec::with_capacity(128);
        if self.written > 0 {
            buf.push(b',');
        }
        serde_json::to_writer(&mut buf, entity)?;
        self.written += 1;
        Ok(Bytes::from(buf))
    }

    /// Closing bracket
    pub fn close(&self) -> Bytes {
        Bytes::from_static(b"]")
    }

    /// Number of entities written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

/// Frame an entity stream as a JSON array body.
///
/// The first entity is awaited before any byte is produced, so a failure on
/// the first upstream call comes back as `Err` here and the caller can still
/// answer with a proper status. Failures after that end the body stream with
/// an `Err` chunk instead of the closing bracket.
pub async fn stream_json_array<S>(
    entities: S,
) -> Result<impl Stream<Item = Result<Bytes>> + Send + 'static>
where
    S: Stream<Item = Result<Value>> + Send + 'static,
{
    let mut entities = Box::pin(entities);
    let first = entities.next().await.transpose()?;
    Ok(frame(first, entities))
}

fn frame<S>(
    first: Option<Value>,
    mut rest: S,
) -> impl Stream<Item = Result<Bytes>> + Send + 'static
where
    S: Stream<Item = Result<Value>> + Send + Unpin + 'static,
{
    try_stream! {
        let mut writer = JsonArrayWriter::new();
        yield writer.open();

        if let Some(first) = first {
            yield writer.entity(&first)?;
            while let Some(entity) = rest.next().await {
                let entity = entity.map_err(|e| {
                    error!("Response stream failed after {} entities: {e}", writer.written());
                    e
                })?;
                yield writer.entity(&entity)?;
            }
        }

        debug!("Streamed {} entities", writer.written());
        yield writer.close();
    }
}
