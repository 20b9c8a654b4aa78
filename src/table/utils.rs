/// Strip one pair of outer double quotes if present.
///
/// Only a single layer is removed, so `""x""` becomes `"x"`. No whitespace
/// trimming: cells are kept as the literal text between the delimiters.
pub fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}

/// Decode a raw field into an owned cell value: lossy UTF-8, then quote stripping.
pub fn cell(raw: &[u8]) -> String {
    strip_quotes(&String::from_utf8_lossy(raw)).to_string()
}
