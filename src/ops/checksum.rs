use crate::config;
use crate::error::{Error, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Streaming MD5 of one file, as a lowercase hex digest.
pub fn md5_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::read(path, e))?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| Error::read(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// MD5 of a directory: hashes the hex digest of each child (file content
/// digests for files, recursive directory digests for subdirectories).
/// Children are visited sorted by name, so the result is stable across
/// filesystems and listing orders.
pub fn md5_dir(path: &Path, exclude: &[String]) -> Result<String> {
    let mut hasher = Md5::new();
    for entry in sorted_entries(path, exclude)? {
        let digest = if entry.is_dir() {
            md5_dir(&entry, exclude)?
        } else {
            md5_file(&entry)?
        };
        hasher.update(digest.as_bytes());
    }
    Ok(hex::encode(hasher.finalize()))
}

fn sorted_entries(path: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    let dir = std::fs::read_dir(path).map_err(|e| Error::read(path, e))?;
    for entry in dir {
        let entry = entry.map_err(|e| Error::read(path, e))?;
        let name = entry.file_name();
        if config::excluded(exclude, &name.to_string_lossy()) {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn known_digest() {
        // RFC 1321 test vector
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vector.txt");
        fs::write(&file, "abc").unwrap();
        assert_eq!(md5_file(&file).unwrap(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn empty_file_digest() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty");
        fs::write(&file, "").unwrap();
        assert_eq!(md5_file(&file).unwrap(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn missing_file_keeps_the_cause() {
        let err = md5_file(Path::new("/no/such/file")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn dir_digest_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "bravo").unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.txt"), "charlie").unwrap();

        let first  = md5_dir(dir.path(), &[]).unwrap();
        let second = md5_dir(dir.path(), &[]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn dir_digest_tracks_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        let before = md5_dir(dir.path(), &[]).unwrap();
        fs::write(dir.path().join("a.txt"), "changed").unwrap();
        let after = md5_dir(dir.path(), &[]).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn excluded_entries_do_not_affect_the_digest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        let clean = md5_dir(dir.path(), &[]).unwrap();

        fs::write(dir.path().join("scratch.tmp"), "noise").unwrap();
        let excl = vec!["*.tmp".to_string()];
        assert_eq!(md5_dir(dir.path(), &excl).unwrap(), clean);
    }
}
