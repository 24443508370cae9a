use std::path::PathBuf;

/// Basic Error types for collar decoding.
#[derive(Debug)]
pub enum CollarError {
    /// IoError from the std library, encountered reading the input file.
    Io(std::io::Error),
    /// TryFromSliceError from the std library, encountered slicing a block.
    TryFromSlice(std::array::TryFromSliceError),
    /// A block's trailer chain would carry the cursor below byte 4.
    MalformedBlock { sequence_number: u32, detail: String },
    /// The CLI was invoked with an arity other than 1 or 3.
    InvalidArgCount { got: usize },
    /// `num_blocks` could not be parsed, or `csv_flag` was not `0`/`1`.
    InvalidBlockCount { requested: String },
    /// Writing an output file failed.
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CollarError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<std::array::TryFromSliceError> for CollarError {
    fn from(e: std::array::TryFromSliceError) -> Self {
        Self::TryFromSlice(e)
    }
}

impl std::fmt::Display for CollarError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use self::CollarError::*;
        match self {
            Io(e) => write!(fmt, "{}", e),
            TryFromSlice(e) => write!(fmt, "{}", e),
            MalformedBlock { sequence_number, detail } => write!(
                fmt,
                "block {} is malformed: {}",
                sequence_number, detail
            ),
            InvalidArgCount { got } => write!(
                fmt,
                "expected 1 or 3 arguments, got {}",
                got
            ),
            InvalidBlockCount { requested } => {
                write!(fmt, "could not parse block count/csv flag from '{}'", requested)
            }
            OutputWrite { path, source } => {
                write!(fmt, "could not write to {}: {}", path.display(), source)
            }
        }
    }
}

impl From<CollarError> for String {
    fn from(e: CollarError) -> String {
        e.to_string()
    }
}

impl std::error::Error for CollarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use self::CollarError::*;
        match self {
            Io(e) => e.source(),
            TryFromSlice(e) => e.source(),
            OutputWrite { source, .. } => source.source(),
            _ => None,
        }
    }
}
