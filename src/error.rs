use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors surfaced by fskit operations.
///
/// Every variant keeps the originating cause, so callers can tell a missing
/// file from a permission problem from a failed external command instead of
/// getting a bare success/failure bit.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ring buffer capacity must be at least 1")]
    InvalidCapacity,

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot copy {} to {}: {source}", .src.display(), .dst.display())]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("archive {} lies inside {}", .archive.display(), .root.display())]
    ArchiveInsideRoot { archive: PathBuf, root: PathBuf },
}

impl Error {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Read { path: path.into(), source }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write { path: path.into(), source }
    }

    /// True when the underlying cause is a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Read { source, .. }
            | Error::Write { source, .. }
            | Error::Copy { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn read_error_names_the_path() {
        let err = Error::read("/etc/fstab", io::Error::from(io::ErrorKind::PermissionDenied));
        let msg = err.to_string();
        assert!(msg.contains("/etc/fstab"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_is_detected_through_variants() {
        let err = Error::read("/gone", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());
        let err = Error::Copy {
            src: "/a".into(),
            dst: "/b".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.is_not_found());
    }
}
