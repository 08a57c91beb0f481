//! Heuristic extraction of `name = id` declarations from Lua source.
//!
//! This is pattern matching, not parsing. Three declaration shapes are
//! recognised for a table named `T` (usually `NetMsg`):
//!
//! - `Module.T = { Login = 100, Logout = 101 }`
//! - `Module.T.Login = 100`
//! - `local T = { ... }` or `T = { ... }`
//!
//! Every pattern bounds the length of what it captures, so matching stays
//! linear in the input size even on huge or corrupted files. The shapes
//! overlap; the same declaration can be reported more than once and the
//! registry deduplicates it.

use lazy_static::lazy_static;
use regex::bytes::Regex;

/// Longest table body a block pattern will capture.
pub const MAX_BLOCK_LEN: usize = 10_000;
/// Longest identifier captured as a message name.
pub const MAX_NAME_LEN: usize = 100;
/// Longest digit run captured as an id.
///
/// Ids are `u64`. A run of this length can still exceed `u64::MAX`
/// (e.g. `99999999999999999999`); such a value is not a match and the
/// declaration is dropped.
pub const MAX_DIGITS: usize = 20;

lazy_static! {
    /// `key = 123` entries inside a table body.
    static ref KEY_VALUE_PATTERN: Regex = Regex::new(&format!(
        r"(?-u)(\w{{1,{MAX_NAME_LEN}}})\s*=\s*(\d{{1,{MAX_DIGITS}}})(?:\D|$)"
    ))
    .unwrap();
}

/// Which declaration shape a match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `X.T = { ... }`
    FieldTable,
    /// `X.T.Name = 123`
    DottedField,
    /// `local T = { ... }` / `T = { ... }`
    BareTable,
}

/// A `(name, id)` pair found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub id: u64,
}

/// Pre-compiled declaration pattern.
struct CompiledDeclaration {
    kind: DeclarationKind,
    regex: Regex,
}

/// Finds identifier-table declarations for one table name.
pub struct Extractor {
    patterns: Vec<CompiledDeclaration>,
}

impl Extractor {
    /// Compile the declaration patterns for `table_name`.
    pub fn new(table_name: &str) -> anyhow::Result<Self> {
        let table = regex::escape(table_name);
        let block = format!(r"\s*=\s*\{{([^}}]{{1,{MAX_BLOCK_LEN}}})\}}");
        let sources = [
            (DeclarationKind::FieldTable, format!(r"(?-u)\.{table}{block}")),
            (
                DeclarationKind::DottedField,
                format!(
                    r"(?-u)\.{table}\.(\w{{1,{MAX_NAME_LEN}}})\s*=\s*(\d{{1,{MAX_DIGITS}}})(?:\D|$)"
                ),
            ),
            (DeclarationKind::BareTable, format!(r"(?-u)\b{table}{block}")),
        ];

        let patterns = sources
            .into_iter()
            .map(|(kind, pattern)| {
                let regex = Regex::new(&pattern)
                    .map_err(|e| anyhow::anyhow!("compiling {:?} pattern: {}", kind, e))?;
                Ok(CompiledDeclaration { kind, regex })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Extract all declarations from `content`, in pattern order.
    pub fn extract(&self, content: &str) -> Vec<Declaration> {
        let bytes = content.as_bytes();
        let mut found = Vec::new();

        for p in &self.patterns {
            for caps in p.regex.captures_iter(bytes) {
                match p.kind {
                    DeclarationKind::FieldTable | DeclarationKind::BareTable => {
                        if let Some(body) = caps.get(1) {
                            found.extend(extract_entries(body.as_bytes()));
                        }
                    }
                    DeclarationKind::DottedField => {
                        if let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) {
                            found.extend(to_declaration(name.as_bytes(), value.as_bytes()));
                        }
                    }
                }
            }
        }

        found
    }
}

/// Pull every `key = 123` entry out of a table body.
fn extract_entries(body: &[u8]) -> Vec<Declaration> {
    KEY_VALUE_PATTERN
        .captures_iter(body)
        .filter_map(|caps| to_declaration(caps.get(1)?.as_bytes(), caps.get(2)?.as_bytes()))
        .collect()
}

/// A digit run above `u64::MAX` is not a match; see [`MAX_DIGITS`].
fn to_declaration(name: &[u8], value: &[u8]) -> Option<Declaration> {
    let name = std::str::from_utf8(name).ok()?;
    let id = std::str::from_utf8(value).ok()?.parse::<u64>().ok()?;
    Some(Declaration {
        name: name.to_string(),
        id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new("NetMsg").unwrap()
    }

    fn pairs(decls: &[Declaration]) -> Vec<(&str, u64)> {
        decls.iter().map(|d| (d.name.as_str(), d.id)).collect()
    }

    #[test]
    fn test_field_table_block() {
        let src = r#"
UGCS.NetMsg = {
    Login = 100,
    Logout = 101,
}
"#;
        let decls = extractor().extract(src);
        // Matched by both the field and the bare pattern
        assert_eq!(
            pairs(&decls),
            vec![("Login", 100), ("Logout", 101), ("Login", 100), ("Logout", 101)]
        );
    }

    #[test]
    fn test_dotted_assignment() {
        let src = "Game.NetMsg.Chat = 300\nGame.NetMsg.Ping=301";
        let decls = extractor().extract(src);
        assert_eq!(pairs(&decls), vec![("Chat", 300), ("Ping", 301)]);
    }

    #[test]
    fn test_local_table() {
        let src = "local NetMsg = { Hello = 7 }";
        let decls = extractor().extract(src);
        assert_eq!(pairs(&decls), vec![("Hello", 7)]);
    }

    #[test]
    fn test_comparison_is_not_assignment() {
        let src = "if msg == Game.NetMsg.Chat then end\nif Game.NetMsg.Chat == 300 then end";
        assert!(extractor().extract(src).is_empty());
    }

    #[test]
    fn test_longer_identifier_is_not_the_table() {
        let src = "MyNetMsg = { Hidden = 5 }";
        assert!(extractor().extract(src).is_empty());
    }

    #[test]
    fn test_non_numeric_values_are_skipped() {
        let src = r#"local NetMsg = { Name = "x", Flag = true, Id = 42 }"#;
        let decls = extractor().extract(src);
        assert_eq!(pairs(&decls), vec![("Id", 42)]);
    }

    #[test]
    fn test_overflowing_number_is_skipped() {
        let src = "Game.NetMsg.Huge = 99999999999999999999\nGame.NetMsg.Ok = 1";
        let decls = extractor().extract(src);
        assert_eq!(pairs(&decls), vec![("Ok", 1)]);

        // Twenty digits up to u64::MAX still fit
        let src = "Game.NetMsg.Max = 18446744073709551615\nGame.NetMsg.Over = 18446744073709551616";
        let decls = extractor().extract(src);
        assert_eq!(pairs(&decls), vec![("Max", u64::MAX)]);
    }

    #[test]
    fn test_over_long_digit_run_is_not_truncated() {
        let src = "Game.NetMsg.TooLong = 123456789012345678901234";
        assert!(extractor().extract(src).is_empty());
    }

    #[test]
    fn test_oversized_block_is_ignored() {
        let mut body = String::from("local NetMsg = {\n");
        while body.len() <= MAX_BLOCK_LEN + 10 {
            body.push_str("    Filler = 1,\n");
        }
        body.push('}');
        assert!(extractor().extract(&body).is_empty());
    }

    #[test]
    fn test_unterminated_block() {
        let src = "local NetMsg = { Open = 1, Close = 2";
        assert!(extractor().extract(src).is_empty());
    }

    #[test]
    fn test_custom_table_name() {
        let ex = Extractor::new("Opcodes").unwrap();
        let decls = ex.extract("Net.Opcodes.Move = 12");
        assert_eq!(pairs(&decls), vec![("Move", 12)]);
    }

    #[test]
    fn test_non_ascii_content_around_declarations() {
        let src = "-- 网络消息定义\nlocal NetMsg = { Login = 100 } -- 登录";
        let decls = extractor().extract(src);
        assert_eq!(pairs(&decls), vec![("Login", 100)]);
    }
}
