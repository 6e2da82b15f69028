use std::io;
use thiserror::Error;

/// The error type for operations that leave the engine: writing a sink's
/// output to disk, finalizing a document.
///
/// The rendering core itself never fails; malformed styles, dangling
/// shape references and geometric degeneracies are all recovered
/// locally.
#[derive(Debug, Error)]
pub enum SextantError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Export error: {0}")]
    Export(String),
}
