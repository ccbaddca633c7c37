//! Line reader: buffers the input table into memory.
//!
//! Ingestion stops at the first blank (all-whitespace) line; everything
//! after it is ignored.

use std::io::BufRead;

use crate::error::TfrError;

/// Read raw lines from `input` up to, and excluding, the first blank line.
///
/// Line terminators (`\n` or `\r\n`) are stripped. Bytes that are not
/// valid UTF-8 become U+FFFD rather than failing the read.
pub fn read_lines<R: BufRead>(mut input: R) -> Result<Vec<String>, TfrError> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).map_err(TfrError::Read)? == 0 {
            break;
        }
        let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);
        if line.trim().is_empty() {
            break;
        }
        lines.push(line.into_owned());
    }
    log::debug!("read {} input lines", lines.len());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    #[test]
    fn test_reads_until_blank_line() {
        let input = Cursor::new("oranges,7\npotatoes,4\n\nignored,1\n");
        let lines = read_lines(input).unwrap();
        assert_eq!(lines, vec!["oranges,7", "potatoes,4"]);
    }

    #[test]
    fn test_whitespace_only_line_stops() {
        let input = Cursor::new("a,1\n   \t\nb,2\n");
        assert_eq!(read_lines(input).unwrap(), vec!["a,1"]);
    }

    #[test]
    fn test_strips_crlf() {
        let input = Cursor::new("a,1\r\nb,2\r\n");
        assert_eq!(read_lines(input).unwrap(), vec!["a,1", "b,2"]);
    }

    #[test]
    fn test_last_line_without_terminator() {
        let input = Cursor::new("a,1\nb,2");
        assert_eq!(read_lines(input).unwrap(), vec!["a,1", "b,2"]);
    }

    #[test]
    fn test_non_utf8_row_is_kept() {
        let input = Cursor::new(&b"caf\xe9,3\noranges,7\n"[..]);
        let lines = read_lines(input).unwrap();
        assert_eq!(lines, vec!["caf\u{fffd},3", "oranges,7"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(read_lines(Cursor::new("")).unwrap().is_empty());
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device unplugged"))
        }
    }

    #[test]
    fn test_read_failure_is_read_error() {
        let err = read_lines(io::BufReader::new(Broken)).unwrap_err();
        assert!(matches!(err, TfrError::Read(_)));
        assert!(err.to_string().contains("device unplugged"));
    }
}
