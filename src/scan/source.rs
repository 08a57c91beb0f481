//! Bounded reading and best-effort decoding of source files.
//!
//! Encodings are tried in a fixed order and the first one that decodes the
//! whole file without error wins. This cannot tell GBK from Latin-1 text
//! reliably; it only has to recover identifiers and digits, which are ASCII
//! in every candidate.

use encoding_rs::{Encoding, GBK, UTF_8, WINDOWS_1252};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::SourceError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A candidate encoding for source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    /// UTF-8 without a byte-order mark.
    Utf8,
    /// UTF-8 with a leading byte-order mark, which is stripped.
    Utf8Sig,
    /// GBK, which also covers GB2312 text.
    Gbk,
    /// Latin-1 (decoded as windows-1252); accepts any byte sequence.
    Latin1,
}

/// Order in which encodings are attempted.
pub const ENCODINGS: &[SourceEncoding] = &[
    SourceEncoding::Utf8,
    SourceEncoding::Utf8Sig,
    SourceEncoding::Gbk,
    SourceEncoding::Latin1,
];

impl SourceEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Utf8Sig => "utf-8-sig",
            SourceEncoding::Gbk => "gbk",
            SourceEncoding::Latin1 => "latin1",
        }
    }

    /// Decode all of `bytes`, or `None` if any of it is malformed.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            SourceEncoding::Utf8 => {
                if bytes.starts_with(UTF8_BOM) {
                    return None;
                }
                strict_decode(UTF_8, bytes)
            }
            SourceEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM)?;
                strict_decode(UTF_8, body)
            }
            SourceEncoding::Gbk => strict_decode(GBK, bytes),
            SourceEncoding::Latin1 => strict_decode(WINDOWS_1252, bytes),
        }
    }
}

impl std::fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn strict_decode(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Try each candidate in [`ENCODINGS`] order.
pub fn decode(bytes: &[u8]) -> Option<(String, SourceEncoding)> {
    ENCODINGS
        .iter()
        .find_map(|enc| enc.decode(bytes).map(|text| (text, *enc)))
}

/// Read and decode a file of at most `limit` bytes.
///
/// Oversized files are rejected outright rather than truncated, so a
/// partially read table never reaches the extractor.
pub fn read_source(path: &Path, limit: u64) -> Result<(String, SourceEncoding), SourceError> {
    let io_err = |source: std::io::Error| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > limit {
        return Err(SourceError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }

    // The file may grow between the size check and the read.
    let mut bytes = Vec::with_capacity(size as usize);
    File::open(path)
        .map_err(io_err)?
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(io_err)?;
    if bytes.len() as u64 > limit {
        return Err(SourceError::TooLarge {
            path: path.to_path_buf(),
            size: bytes.len() as u64,
            limit,
        });
    }

    decode(&bytes).ok_or_else(|| SourceError::Undecodable {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decode_plain_utf8() {
        let (text, enc) = decode("Login = 100 -- 登录".as_bytes()).unwrap();
        assert_eq!(enc, SourceEncoding::Utf8);
        assert!(text.contains("登录"));
    }

    #[test]
    fn test_decode_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"Login = 100");
        let (text, enc) = decode(&bytes).unwrap();
        assert_eq!(enc, SourceEncoding::Utf8Sig);
        assert_eq!(text, "Login = 100");
    }

    #[test]
    fn test_decode_gbk() {
        // "登录" in GBK, invalid as UTF-8
        let mut bytes = b"-- ".to_vec();
        bytes.extend_from_slice(&[0xB5, 0xC7, 0xC2, 0xBC]);
        bytes.extend_from_slice(b"\nLogin = 100");
        let (text, enc) = decode(&bytes).unwrap();
        assert_eq!(enc, SourceEncoding::Gbk);
        assert!(text.contains("登录"));
        assert!(text.contains("Login = 100"));
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // 0xFF is malformed in both UTF-8 and GBK
        let bytes = b"Name = 5 \xFF";
        let (text, enc) = decode(bytes).unwrap();
        assert_eq!(enc, SourceEncoding::Latin1);
        assert!(text.starts_with("Name = 5"));
    }

    #[test]
    fn test_read_source_rejects_oversized() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("big.lua");
        std::fs::write(&path, vec![b'a'; 64]).unwrap();

        match read_source(&path, 32) {
            Err(SourceError::TooLarge { size, limit, .. }) => {
                assert_eq!(size, 64);
                assert_eq!(limit, 32);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_read_source_at_limit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("exact.lua");
        std::fs::write(&path, "A = 1").unwrap();
        let (text, _) = read_source(&path, 5).unwrap();
        assert_eq!(text, "A = 1");
    }

    #[test]
    fn test_read_source_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = read_source(&temp.path().join("gone.lua"), 1024);
        assert!(matches!(result, Err(SourceError::Io { .. })));
    }
}
