use std::fmt;

use thiserror::Error;

/// Which wrapper a buffer error came from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Index,
    Vertex,
    Storage,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BufferKind::Index => "index",
            BufferKind::Vertex => "vertex",
            BufferKind::Storage => "storage",
        })
    }
}

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum BufferError {
    /// Zero-length uploads are rejected instead of creating an unusable buffer.
    #[error("{kind} buffer has no elements")]
    Empty { kind: BufferKind },

    #[error("{kind} buffer needs {bytes} bytes but the device allows {limit}")]
    TooLarge {
        kind: BufferKind,
        bytes: u64,
        limit: u64,
    },

    #[error("{kind} buffer has {count} elements, draw calls address at most u32::MAX")]
    TooManyElements { kind: BufferKind, count: usize },
}

/// Element count as draw calls take it.
pub(crate) fn element_count(kind: BufferKind, len: usize) -> Result<u32, BufferError> {
    u32::try_from(len).map_err(|_| BufferError::TooManyElements { kind, count: len })
}

/// Checks an upload size against emptiness and the device limit.
pub(crate) fn check_upload(kind: BufferKind, bytes: u64, limit: u64) -> Result<(), BufferError> {
    if bytes == 0 {
        return Err(BufferError::Empty { kind });
    }
    if bytes > limit {
        return Err(BufferError::TooLarge { kind, bytes, limit });
    }
    Ok(())
}
