use crate::config;
use crate::error::{Error, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Counters from an archive run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveStats {
    pub files: u64,
    pub bytes: u64,
}

/// Pack everything under `root` into a gzip-compressed tarball at `archive`,
/// overwriting any existing archive. Entry paths are relative to `root` and
/// the walk is sorted, so the same tree always produces the same entry order.
/// An archive path inside `root` is rejected up front, since the archive
/// would try to pack itself.
pub fn tar_gz_dir(root: &Path, archive: &Path, exclude: &[String]) -> Result<ArchiveStats> {
    ensure_outside(root, archive)?;

    let file = File::create(archive).map_err(|e| Error::write(archive, e))?;
    let enc = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(enc);
    let mut stats = ArchiveStats::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !config::excluded(exclude, &e.file_name().to_string_lossy())
        });

    for entry in walker {
        let entry = entry.map_err(|source| Error::Walk { path: root.to_path_buf(), source })?;
        if entry.depth() == 0 {
            continue;
        }
        // Fallback guard: never pack the archive we are writing.
        if entry.path() == archive {
            continue;
        }
        let rel = match entry.path().strip_prefix(root) {
            Ok(r)  => r,
            Err(_) => continue,
        };

        if entry.file_type().is_dir() {
            builder
                .append_dir(rel, entry.path())
                .map_err(|e| Error::write(archive, e))?;
        } else {
            builder
                .append_path_with_name(entry.path(), rel)
                .map_err(|e| Error::write(archive, e))?;
            stats.files += 1;
            stats.bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }

    let enc = builder.into_inner().map_err(|e| Error::write(archive, e))?;
    enc.finish().map_err(|e| Error::write(archive, e))?;
    debug!(files = stats.files, bytes = stats.bytes, "archive written");
    Ok(stats)
}

fn ensure_outside(root: &Path, archive: &Path) -> Result<()> {
    let root = root.canonicalize().map_err(|e| Error::read(root, e))?;
    // The archive usually doesn't exist yet; resolve through its parent.
    let parent = match archive.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(p) => p,
        None    => Path::new("."),
    };
    let resolved = match parent.canonicalize() {
        Ok(p)  => match archive.file_name() {
            Some(name) => p.join(name),
            None       => p,
        },
        Err(_) => return Ok(()),
    };
    if resolved.starts_with(&root) {
        return Err(Error::ArchiveInsideRoot {
            archive: resolved,
            root,
        });
    }
    Ok(())
}
