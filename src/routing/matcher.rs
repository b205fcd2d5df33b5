//! Route matching module
//!
//! Implements segment-wise path matching for patterns such as
//! `/api/update/{hero-name}`.

/// Match `path` against `pattern`, returning the captured `{param}` value
/// (percent-decoded) on success.
///
/// Literal segments must be equal, including empty ones, so `/api/` does not
/// match `/api`. A `{param}` segment matches exactly one non-empty segment,
/// judged after decoding, so an escaped `%2F` cannot put a `/` in the value.
/// Patterns carry at most one parameter.
pub fn match_path(pattern: &str, path: &str) -> Option<PathMatch> {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    let mut param = None;

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(PathMatch { param }),
            (Some(expected), Some(actual)) => {
                if is_param(expected) {
                    let decoded = percent_decode(actual);
                    if decoded.is_empty() || decoded.contains('/') {
                        return None;
                    }
                    param = Some(decoded);
                } else if expected != actual {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

/// Result of a successful path match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    pub param: Option<String>,
}

fn is_param(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// Decode `%XX` escapes. Malformed escapes are kept as-is and invalid UTF-8
/// is replaced rather than rejected.
pub fn percent_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                decoded.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
