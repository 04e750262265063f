use crate::config;
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Counters from a tree copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyStats {
    pub files: u64,
    pub dirs:  u64,
    pub bytes: u64,
}

/// Copy one file. A directory destination means "same file name inside it".
/// Returns the number of bytes copied.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    let target = if dst.is_dir() {
        match src.file_name() {
            Some(name) => dst.join(name),
            None => {
                return Err(Error::Copy {
                    src: src.to_path_buf(),
                    dst: dst.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
                })
            }
        }
    } else {
        dst.to_path_buf()
    };

    fs::copy(src, &target).map_err(|source| Error::Copy {
        src: src.to_path_buf(),
        dst: target,
        source,
    })
}

/// Recursively copy `src` into `dst`, creating destination directories as
/// needed. Walk order is sorted; excluded names are skipped subtree and all.
pub fn copy_tree(src: &Path, dst: &Path, exclude: &[String]) -> Result<CopyStats> {
    let mut stats = CopyStats::default();

    let walker = WalkDir::new(src)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !config::excluded(exclude, &e.file_name().to_string_lossy())
        });

    for entry in walker {
        let entry = entry.map_err(|source| Error::Walk { path: src.to_path_buf(), source })?;
        let rel = match entry.path().strip_prefix(src) {
            Ok(r)  => r,
            Err(_) => continue,
        };
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::write(&target, e))?;
            if entry.depth() > 0 {
                stats.dirs += 1;
            }
        } else {
            stats.bytes += fs::copy(entry.path(), &target).map_err(|source| Error::Copy {
                src: entry.path().to_path_buf(),
                dst: target,
                source,
            })?;
            stats.files += 1;
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn copy_file_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        fs::write(&src, "payload").unwrap();

        let n = copy_file(&src, &dst).unwrap();
        assert_eq!(n, 7);
        assert_eq!(fs::read_to_string(dst).unwrap(), "payload");
    }

    #[test]
    fn copy_file_into_directory_keeps_the_name() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("notes.txt");
        let sub = dir.path().join("backup");
        fs::write(&src, "x").unwrap();
        fs::create_dir(&sub).unwrap();

        copy_file(&src, &sub).unwrap();
        assert!(sub.join("notes.txt").is_file());
    }

    #[test]
    fn copy_missing_file_keeps_the_cause() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(Path::new("/no/such/file"), dir.path()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn copy_tree_replicates_structure() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::create_dir_all(src.join("a/b")).unwrap();
        fs::write(src.join("top.txt"), "top").unwrap();
        fs::write(src.join("a/one.txt"), "one").unwrap();
        fs::write(src.join("a/b/two.txt"), "two").unwrap();

        let stats = copy_tree(&src, &dst, &[]).unwrap();
        assert_eq!(stats.files, 3);
        assert_eq!(stats.dirs, 2);
        assert_eq!(stats.bytes, 9);
        assert_eq!(fs::read_to_string(dst.join("a/b/two.txt")).unwrap(), "two");
    }

    #[test]
    fn copy_tree_skips_excluded_subtrees() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::create_dir_all(src.join("cache")).unwrap();
        fs::write(src.join("keep.txt"), "k").unwrap();
        fs::write(src.join("cache/drop.txt"), "d").unwrap();
        fs::write(src.join("scratch.tmp"), "t").unwrap();

        let excl = vec!["cache".to_string(), "*.tmp".to_string()];
        let stats = copy_tree(&src, &dst, &excl).unwrap();
        assert_eq!(stats.files, 1);
        assert!(dst.join("keep.txt").is_file());
        assert!(!dst.join("cache").exists());
        assert!(!dst.join("scratch.tmp").exists());
    }
}
