use crate::error::{Error, Result};
use crate::util::ring_buffer::RingBuffer;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// All lines of `path` matching `pattern`, newline-terminated, concatenated
/// in file order. No match yields an empty string.
pub fn grep(path: &Path, pattern: &str) -> Result<String> {
    let re = Regex::new(pattern)?;
    let mut out = String::new();
    for line in read_lines(path)? {
        let line = line.map_err(|e| Error::read(path, e))?;
        if re.is_match(&line) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    Ok(out)
}

/// Like `grep`, but keeps only the last `keep` matching lines. Earlier
/// matches fall out of the ring buffer as later ones arrive.
pub fn grep_last(path: &Path, pattern: &str, keep: usize) -> Result<Vec<String>> {
    let re = Regex::new(pattern)?;
    let mut last = RingBuffer::new(keep)?;
    for line in read_lines(path)? {
        let line = line.map_err(|e| Error::read(path, e))?;
        if re.is_match(&line) {
            last.push(line);
        }
    }
    Ok(last.into_vec())
}

fn read_lines(path: &Path) -> Result<Lines<BufReader<File>>> {
    let file = File::open(path).map_err(|e| Error::read(path, e))?;
    Ok(BufReader::new(file).lines())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn fixture(lines: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(lines.as_bytes()).unwrap();
        f
    }

    #[test]
    fn matching_lines_are_concatenated() {
        let f = fixture("alpha\nbeta\nalphabet\ngamma\n");
        let out = grep(f.path(), "alpha").unwrap();
        assert_eq!(out, "alpha\nalphabet\n");
    }

    #[test]
    fn no_match_yields_empty_string() {
        let f = fixture("alpha\nbeta\n");
        assert_eq!(grep(f.path(), "delta").unwrap(), "");
    }

    #[test]
    fn pattern_is_a_real_regex() {
        let f = fixture("error: disk full\nwarning: slow\nerror: io\n");
        let out = grep(f.path(), "^error:").unwrap();
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn missing_file_keeps_the_cause() {
        let err = grep(Path::new("/no/such/file"), "x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_pattern_is_typed() {
        let f = fixture("a\n");
        let err = grep(f.path(), "(unclosed").unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }

    #[test]
    fn grep_last_keeps_only_the_tail() {
        let f = fixture("m1\nx\nm2\nm3\nx\nm4\n");
        let out = grep_last(f.path(), "^m", 2).unwrap();
        assert_eq!(out, vec!["m3".to_string(), "m4".to_string()]);
    }

    #[test]
    fn grep_last_zero_keep_is_rejected() {
        let f = fixture("m1\n");
        let err = grep_last(f.path(), "^m", 0).unwrap_err();
        assert!(matches!(err, Error::InvalidCapacity));
    }
}
