//! Named pattern groups.
//!
//! A named token such as [`IMAGE_EXTENSIONS`] stands for a fixed, ordered list of patterns. The
//! table is static and never changes at runtime.

/// Token expanding to the common raster image file extensions, in either letter case.
pub const IMAGE_EXTENSIONS: &str = "_IMAGE_EXTENSIONS_";

static PATTERN_DICTIONARY: &[(&str, &[&str])] = &[(
    IMAGE_EXTENSIONS,
    &[
        "*.[jJ][pP][gG]",
        "*.[jJ][pP][eE][gG]",
        "*.[pP][nN][gG]",
        "*.[gG][iI][fF]",
        "*.[bB][mM][pP]",
        "*.[wW][eE][bB][pP]",
        "*.[tT][iI][fF]",
        "*.[tT][iI][fF][fF]",
    ],
)];

/// Look up the patterns a named token stands for.
pub fn lookup(token: &str) -> Option<&'static [&'static str]> {
    PATTERN_DICTIONARY
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, patterns)| *patterns)
}

/// All known named tokens.
pub fn tokens() -> impl Iterator<Item = &'static str> {
    PATTERN_DICTIONARY.iter().map(|(name, _)| *name)
}

/// Replace every named token in `patterns` by its expansion, in place. Anything else is kept as
/// is, including strings which merely look like tokens.
pub fn translate<I, S>(patterns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        match lookup(pattern) {
            Some(expansion) => {
                crate::trace::trace_token_expanded(pattern, expansion.len());
                out.extend(expansion.iter().map(|p| p.to_string()));
            }
            None => out.push(pattern.to_string()),
        }
    }
    out
}
