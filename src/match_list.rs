//! Ordered pattern lists and how a path is tested against them.
use bitflags::bitflags;

use crate::{ParseError, Pattern, PatternFlag};

bitflags! {
    /// These flags influence which parts of a path an entry is tested against.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MatchFlag: u16 {
        /// Match only the complete path. The pattern `bar` will not match `foo/bar`.
        const ANCHORED = 0x00_01;
    }
}

/// A single compiled entry of a [`PatternList`].
#[derive(Clone, Debug)]
pub struct MatchEntry {
    pattern: Pattern,
    flags: MatchFlag,
}

impl From<Pattern> for MatchEntry {
    fn from(pattern: Pattern) -> Self {
        Self::new(pattern)
    }
}

impl MatchEntry {
    /// Create a new entry with default flags.
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            flags: MatchFlag::default(),
        }
    }

    /// Compile `pattern` with `PatternFlag::PATH_NAME` plus `pattern_flags`.
    pub fn parse<T: AsRef<str>>(pattern: T, pattern_flags: PatternFlag) -> Result<Self, ParseError> {
        Ok(Self::new(Pattern::new(
            pattern,
            pattern_flags | PatternFlag::PATH_NAME,
        )?))
    }

    /// Builder method to set the match flags to a specific value.
    pub fn flags(mut self, flags: MatchFlag) -> Self {
        self.flags = flags;
        self
    }

    /// Builder method to add flag bits to the already present ones.
    pub fn add_flags(mut self, flags: MatchFlag) -> Self {
        self.flags.insert(flags);
        self
    }

    /// Directly access the pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Directly access the match flags.
    pub fn match_flags(&self) -> MatchFlag {
        self.flags
    }

    /// Test whether this entry's pattern matches any complete suffix of a path.
    ///
    /// For the path `photos/2024/a.png`, this tests whether `a.png`, `2024/a.png` or
    /// `photos/2024/a.png` is matched. Anchored entries only test the whole path.
    pub fn matches<T: AsRef<[u8]>>(&self, path: T) -> bool {
        self.matches_do(path.as_ref())
    }

    fn matches_do(&self, path: &[u8]) -> bool {
        if self.flags.intersects(MatchFlag::ANCHORED) {
            return self.matches_exact(path);
        }

        // a trailing slash does not start another component
        path.iter()
            .enumerate()
            .rev()
            .filter(|&(pos, &b)| b == b'/' && pos + 1 < path.len())
            .any(|(start, _)| self.pattern.matches(&path[(start + 1)..]))
            || self.pattern.matches(path)
    }

    /// Test whether this entry's pattern matches a path exactly.
    pub fn matches_exact<T: AsRef<[u8]>>(&self, path: T) -> bool {
        self.pattern.matches(path)
    }
}

/// An ordered list of [`MatchEntry`] items, evaluated first to last.
///
/// Unlike include/exclude rule lists, every entry here has the same meaning, so only the first
/// match matters and evaluation stops there.
#[derive(Clone, Debug, Default)]
pub struct PatternList {
    entries: Vec<MatchEntry>,
}

impl PatternList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile each pattern of `patterns` in order, stopping at the first one which fails.
    ///
    /// On failure the offending pattern text is returned alongside the error.
    pub fn compile<I, S>(
        patterns: I,
        pattern_flags: PatternFlag,
        match_flags: MatchFlag,
    ) -> Result<Self, (String, ParseError)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let entry = MatchEntry::parse(pattern, pattern_flags)
                .map_err(|err| (pattern.to_string(), err))?;
            list.push(entry.flags(match_flags));
        }
        Ok(list)
    }

    pub fn push(&mut self, entry: MatchEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchEntry> {
        self.entries.iter()
    }

    /// Check whether any entry matches `path`.
    pub fn matches<T: AsRef<[u8]>>(&self, path: T) -> bool {
        self.first_match(path).is_some()
    }

    /// The first entry, in list order, matching `path`.
    pub fn first_match<T: AsRef<[u8]>>(&self, path: T) -> Option<&MatchEntry> {
        let path = path.as_ref();
        self.entries.iter().find(|entry| entry.matches(path))
    }
}

impl<'a> IntoIterator for &'a PatternList {
    type Item = &'a MatchEntry;
    type IntoIter = std::slice::Iter<'a, MatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<MatchEntry> for PatternList {
    fn from_iter<I: IntoIterator<Item = MatchEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[test]
fn test_anchored_matches() {
    let list: PatternList = [
        MatchEntry::new(Pattern::path("file-a").unwrap()),
        MatchEntry::new(Pattern::path("some/path").unwrap()).add_flags(MatchFlag::ANCHORED),
    ]
    .into_iter()
    .collect();

    assert!(list.matches("file-a"));
    assert!(list.matches("another/file-a"));

    assert!(!list.matches("some"));
    assert!(!list.matches("path"));
    assert!(list.matches("some/path"));
    assert!(!list.matches("another/some/path"));
}

#[test]
fn test_path_relativity() {
    let list = PatternList::compile(
        ["noslash", "/slash", "*.png"],
        PatternFlag::empty(),
        MatchFlag::empty(),
    )
    .unwrap();

    assert!(list.matches("noslash"));
    assert!(list.matches("foo/noslash"));
    assert!(!list.matches("foo/noslashx"));
    assert!(list.matches("/slash"));
    assert!(!list.matches("slash"));
    assert!(!list.matches("foo/slash"));
    assert!(list.matches("img/a.png"));
    assert!(list.matches("/img/deep/a.png"));
    assert!(!list.matches("img/a.png/thumb"));
    assert!(!list.matches(""));
}

#[test]
fn test_first_match_order() {
    let list = PatternList::compile(["*.jpg", "a*", "*"], PatternFlag::empty(), MatchFlag::empty())
        .unwrap();

    assert_eq!(list.len(), 3);
    assert_eq!(
        list.first_match("a.jpg").map(|e| e.pattern().as_str()),
        Some("*.jpg")
    );
    assert_eq!(
        list.first_match("abc").map(|e| e.pattern().as_str()),
        Some("a*")
    );
    assert_eq!(
        list.first_match("zzz").map(|e| e.pattern().as_str()),
        Some("*")
    );

    let empty = PatternList::new();
    assert!(empty.is_empty());
    assert!(!empty.matches("anything"));
}

#[test]
fn test_compile_reports_offending_pattern() {
    let (pattern, err) = PatternList::compile(
        ["*.png", "[abc", "[def"],
        PatternFlag::empty(),
        MatchFlag::empty(),
    )
    .unwrap_err();
    assert_eq!(pattern, "[abc");
    assert_eq!(err, ParseError::UnclosedCharacterClass(0));
}

#[test]
fn test_empty_path() {
    let loose = MatchEntry::from(Pattern::path("*").unwrap());
    let anchored = MatchEntry::from(Pattern::path("*").unwrap()).flags(MatchFlag::ANCHORED);
    assert_eq!(loose.match_flags(), MatchFlag::empty());
    assert_eq!(anchored.match_flags(), MatchFlag::ANCHORED);

    for path in ["", "a", "a/", "a/b"] {
        assert_eq!(loose.matches_exact(path), anchored.matches(path), "{path:?}");
    }
    assert!(loose.matches(""));
    assert!(anchored.matches(""));
    assert!(!loose.matches("a/"));
    assert!(loose.matches("a/b"));
    assert!(!anchored.matches("a/b"));
}

#[test]
fn test_iterate_by_reference() {
    let list = PatternList::compile(["*.png", "tmp/*"], PatternFlag::empty(), MatchFlag::ANCHORED)
        .unwrap();

    let mut seen = Vec::new();
    for entry in &list {
        assert_eq!(entry.match_flags(), MatchFlag::ANCHORED);
        seen.push(entry.pattern().as_str());
    }
    assert_eq!(seen, ["*.png", "tmp/*"]);
}
