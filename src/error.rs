use std::io;
use thiserror::Error;

/// Unrecoverable storage faults. The top level prints the message and
/// terminates; statement-level mistakes travel through the vm enums instead.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Db file is not a whole number of pages. Corrupt file.")]
    CorruptFileLength,
    #[error("Tried to fetch page number out of bounds. {page_num} >= {max}")]
    PageOutOfBounds { page_num: usize, max: usize },
    #[error("Tried to flush null page")]
    FlushNullPage,
    #[error("Page {page_num} holds an internal node; only leaf nodes exist in this format")]
    UnexpectedInternalNode { page_num: usize },
    #[error("Corrupt node header: {0}")]
    CorruptHeader(#[from] bincode::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
