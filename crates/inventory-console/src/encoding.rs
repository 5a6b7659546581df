//! Percent-encoding for path segments and query values

/// Characters `urlencoding` escapes that a URI component may carry verbatim
const SUB_DELIMS: &[(&str, &str)] = &[
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Encode a single URI component (a path segment or a query value).
///
/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is percent-encoded as
/// UTF-8, so `/`, `?`, `#`, `&`, `=`, `{`, `}` and spaces never leak into the
/// surrounding URL structure.
pub fn encode_component(raw: &str) -> String {
    let mut encoded = urlencoding::encode(raw).into_owned();
    for (escaped, literal) in SUB_DELIMS {
        if encoded.contains(escaped) {
            encoded = encoded.replace(escaped, literal);
        }
    }
    encoded
}
