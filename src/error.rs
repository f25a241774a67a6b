use std::fmt;

use crate::ParseError;

/// Which of the two pattern lists of a filter something refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListKind {
    Allowed,
    Excluded,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ListKind::Allowed => "include",
            ListKind::Excluded => "exclude",
        })
    }
}

/// Error produced when a filter cannot be compiled.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A pattern, after token expansion, is not a valid glob.
    #[error("{list} patterns are invalid: '{pattern}': {source}")]
    InvalidPattern {
        list: ListKind,
        pattern: String,
        #[source]
        source: ParseError,
    },
}

impl Error {
    pub(crate) fn invalid_pattern(list: ListKind, pattern: String, source: ParseError) -> Self {
        Error::InvalidPattern {
            list,
            pattern,
            source,
        }
    }

    /// The list the offending pattern came from.
    pub fn list(&self) -> ListKind {
        match self {
            Error::InvalidPattern { list, .. } => *list,
        }
    }

    /// The offending pattern, as it was after token expansion.
    pub fn pattern(&self) -> &str {
        match self {
            Error::InvalidPattern { pattern, .. } => pattern,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invalid_pattern_preserves_list_pattern_and_source() {
        let error = Error::invalid_pattern(
            ListKind::Excluded,
            "[abc".into(),
            ParseError::UnclosedCharacterClass(0),
        );

        assert_eq!(error.list(), ListKind::Excluded);
        assert_eq!(error.pattern(), "[abc");
        assert_eq!(
            error.to_string(),
            "exclude patterns are invalid: '[abc': unclosed character class in pattern, starting at byte 0"
        );
        assert_eq!(
            error.source().map(|s| s.to_string()),
            Some(ParseError::UnclosedCharacterClass(0).to_string())
        );
    }
}
