//! Glob patterns for path strings, using the matching rules of git's `wildmatch.c`.

use std::mem;
use std::ops::RangeInclusive;

use bitflags::bitflags;

/// A bracket expression: listed bytes `[abc]`, ranges `[a-z]`, named classes `[[:digit:]]`, or
/// any mix of them, optionally negated with a leading `^` or `!`.
#[derive(Clone, Debug, Default)]
struct CharacterClass {
    negated: bool,
    named: Vec<fn(u8) -> bool>,
    listed: Vec<u8>,
    ranges: Vec<RangeInclusive<u8>>,
}

impl CharacterClass {
    fn matches(&self, ch: u8, flags: PatternFlag) -> bool {
        let found = if flags.intersects(PatternFlag::IGNORE_CASE) {
            self.contains(ch.to_ascii_lowercase()) || self.contains(ch.to_ascii_uppercase())
        } else {
            self.contains(ch)
        };
        found != self.negated
    }

    fn contains(&self, ch: u8) -> bool {
        self.listed.contains(&ch)
            || self.ranges.iter().any(|range| range.contains(&ch))
            || self.named.iter().any(|func| func(ch))
    }
}

/// One component of a compiled pattern.
#[derive(Clone, Debug)]
enum Component {
    /// A literal run. The `img/` and `.png` in `img/*.png`.
    Literal(Vec<u8>),

    /// Exactly one byte (never a slash for `PATH_NAME` patterns).
    QuestionMark,

    /// Any run of bytes, stopping at slashes for `PATH_NAME` patterns.
    Star,

    /// Any run of bytes including slashes. Only produced for a `**` bounded by slashes or the
    /// ends of the pattern.
    StarStar,

    /// One byte out of a set.
    Class(CharacterClass),
}

impl Component {
    fn ends_with_slash(&self) -> bool {
        matches!(self, Component::Literal(lit) if lit.last() == Some(&b'/'))
    }

    fn starts_with_slash(&self) -> bool {
        matches!(self, Component::Literal(lit) if lit.first() == Some(&b'/'))
    }
}

bitflags! {
    /// Flags affecting how a pattern should match.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PatternFlag: u8 {
        /// Ignore upper/lower case. Only ascii letters are folded.
        const IGNORE_CASE = 0x01;

        /// `*`, `?` and bracket expressions do not match slashes. Only explicit slashes and `**`
        /// can.
        const PATH_NAME = 0x02;
    }
}

/// Error cases which may happen while parsing a pattern.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("null-byte in pattern")]
    NulByteError,

    #[error("trailing backslash in pattern")]
    TrailingBackslash,

    #[error("unclosed character class in pattern, starting at byte {0}")]
    UnclosedCharacterClass(usize),

    #[error("malformed named character class in pattern, starting at byte {0}")]
    MalformedNamedCharacterClass(usize),
}

/// Outcome of matching the remaining components against the remaining text.
enum MatchResult {
    Match,
    NoMatch,
    AbortAll,
    AbortToStarStar,
}

/// An `fnmatch`-like pattern with git's `*` vs `**` distinction for paths.
///
/// Patterns and texts are treated as bytes, so UTF-8 paths work but `IGNORE_CASE` only folds
/// ascii letters.
#[derive(Clone, Debug)]
pub struct Pattern {
    /// The text the pattern was compiled from.
    source: String,
    components: Vec<Component>,
    flags: PatternFlag,
}

impl Pattern {
    /// The text this pattern was compiled from, trailing slashes included.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The flags this pattern was compiled with.
    pub fn flags(&self) -> PatternFlag {
        self.flags
    }

    /// Compile a pattern.
    pub fn new<T: AsRef<str>>(pattern: T, flags: PatternFlag) -> Result<Self, ParseError> {
        Self::new_do(pattern.as_ref(), flags)
    }

    /// Shortcut for [`Pattern::new`] with `PatternFlag::PATH_NAME`.
    pub fn path<T: AsRef<str>>(pattern: T) -> Result<Self, ParseError> {
        Self::new_do(pattern.as_ref(), PatternFlag::PATH_NAME)
    }

    fn new_do(source: &str, flags: PatternFlag) -> Result<Self, ParseError> {
        let bytes = source.as_bytes();

        // `tmp/` and `tmp` name the same entry. The empty pattern only matches the empty text.
        let pattern = match bytes.iter().rposition(|&b| b != b'/') {
            Some(pos) => &bytes[..=pos],
            None if bytes.is_empty() => b"",
            None => b"/",
        };

        let mut components = Vec::new();
        let mut literal = Vec::new();

        let mut i = 0;
        while i < pattern.len() {
            match pattern[i] {
                0 => return Err(ParseError::NulByteError),
                b'\\' => {
                    i += 1;
                    match pattern.get(i) {
                        Some(0) => return Err(ParseError::NulByteError),
                        Some(&ch) => literal.push(ch),
                        None => return Err(ParseError::TrailingBackslash),
                    }
                }
                b'?' => {
                    flush_literal(&mut literal, &mut components);
                    components.push(Component::QuestionMark);
                }
                b'*' => {
                    flush_literal(&mut literal, &mut components);
                    let begin = i;
                    while pattern.get(i + 1) == Some(&b'*') {
                        i += 1;
                    }

                    // Like git, `**` only crosses directories as `**`, `**/...`, `.../**` or
                    // `.../**/...`. Anywhere else it is a plain star.
                    let bounded = (begin == 0 || pattern[begin - 1] == b'/')
                        && (i + 1 == pattern.len() || pattern[i + 1] == b'/');
                    if i > begin && bounded {
                        components.push(Component::StarStar);
                    } else {
                        components.push(Component::Star);
                    }
                }
                b'[' => {
                    flush_literal(&mut literal, &mut components);
                    let (class, end) = parse_char_class(pattern, i)?;
                    components.push(Component::Class(class));
                    i = end;
                }
                ch => literal.push(ch),
            }
            i += 1;
        }
        flush_literal(&mut literal, &mut components);

        Ok(Self {
            source: source.to_string(),
            components,
            flags,
        })
    }

    /// Check whether this pattern matches the whole of `text`.
    pub fn matches<T: AsRef<[u8]>>(&self, text: T) -> bool {
        let text = text.as_ref();

        if let [Component::StarStar, next, ..] = &self.components[..] {
            // A leading `**/` may also match no directory at all: `**/foo` matches `foo`.
            if next.starts_with_slash() {
                let mut rooted = Vec::with_capacity(text.len() + 1);
                rooted.push(b'/');
                rooted.extend_from_slice(text);
                if let MatchResult::Match = self.do_matches(1, &rooted, 0) {
                    return true;
                }
            }
        }

        matches!(self.do_matches(0, text, 0), MatchResult::Match)
    }

    // Ported from git's wildmatch.c. `*` is non-greedy: it tries the shortest expansion first and
    // grows it one byte at a time, so running out of text while a non-star component is still
    // pending means no longer expansion can succeed either (`AbortAll`). A `*` that would have to
    // cross a slash reports `AbortToStarStar` so that only an enclosing `**` keeps trying.
    fn do_matches(&self, mut ci: usize, text: &[u8], mut ti: usize) -> MatchResult {
        let path_name = self.flags.intersects(PatternFlag::PATH_NAME);

        while ci < self.components.len() {
            match &self.components[ci] {
                Component::Literal(literal) => {
                    if ti == text.len() {
                        return MatchResult::AbortAll;
                    }
                    if !starts_with(&text[ti..], literal, self.flags) {
                        return MatchResult::NoMatch;
                    }
                    ti += literal.len();
                }
                Component::QuestionMark => {
                    if ti == text.len() {
                        return MatchResult::AbortAll;
                    }
                    if path_name && text[ti] == b'/' {
                        return MatchResult::NoMatch;
                    }
                    ti += 1;
                }
                Component::Class(class) => {
                    if ti == text.len() {
                        return MatchResult::AbortAll;
                    }
                    if path_name && text[ti] == b'/' {
                        return MatchResult::NoMatch;
                    }
                    if !class.matches(text[ti], self.flags) {
                        return MatchResult::NoMatch;
                    }
                    ti += 1;
                }
                Component::Star if path_name => {
                    if ci + 1 == self.components.len() && !text[ti..].contains(&b'/') {
                        return MatchResult::Match;
                    }

                    loop {
                        if ti == text.len() {
                            return MatchResult::AbortAll;
                        }
                        match self.do_matches(ci + 1, text, ti) {
                            MatchResult::NoMatch => {
                                if text[ti] == b'/' {
                                    return MatchResult::AbortToStarStar;
                                }
                            }
                            other => return other,
                        }
                        ti += 1;
                    }
                }
                Component::Star | Component::StarStar => {
                    if ci + 1 == self.components.len() {
                        return MatchResult::Match;
                    }

                    // `foo/` `**` `/bar` also matches `foo/bar`: step back onto the slash the
                    // previous literal consumed and let `**` match nothing.
                    if matches!(self.components[ci], Component::StarStar)
                        && ci > 0
                        && self.components[ci - 1].ends_with_slash()
                        && self.components[ci + 1].starts_with_slash()
                    {
                        if let MatchResult::Match = self.do_matches(ci + 1, text, ti - 1) {
                            return MatchResult::Match;
                        }
                    }

                    loop {
                        if ti == text.len() {
                            return MatchResult::AbortAll;
                        }
                        match self.do_matches(ci + 1, text, ti) {
                            MatchResult::NoMatch | MatchResult::AbortToStarStar => (),
                            other => return other,
                        }
                        ti += 1;
                    }
                }
            }
            ci += 1;
        }

        if ti == text.len() {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Pattern {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::path(s)
    }
}

fn flush_literal(literal: &mut Vec<u8>, components: &mut Vec<Component>) {
    if !literal.is_empty() {
        components.push(Component::Literal(mem::take(literal)));
    }
}

/// Parse the bracket expression opening at `begin`. Returns the class and the index of its
/// closing `]`.
fn parse_char_class(pattern: &[u8], begin: usize) -> Result<(CharacterClass, usize), ParseError> {
    let mut i = begin + 1;
    let mut class = CharacterClass::default();

    if matches!(pattern.get(i), Some(b'^') | Some(b'!')) {
        class.negated = true;
        i += 1;
    }

    // A `]` right after the opening bracket is a literal member: `[]a]`.
    let first = i;
    let mut prev: Option<u8> = None;
    while i < pattern.len() {
        let mut new_prev = None;
        match pattern[i] {
            0 => return Err(ParseError::NulByteError),
            b']' if i != first => return Ok((class, i)),
            b'[' if pattern.get(i + 1) == Some(&b':') => {
                let rest = &pattern[(i + 2)..];
                let len = rest
                    .windows(2)
                    .position(|w| w == b":]")
                    .ok_or(ParseError::MalformedNamedCharacterClass(begin))?;
                class.named.push(named_class(&rest[..len], begin)?);
                // skip to the `]` closing `[:name:]`
                i += len + 3;
            }
            b'\\' => {
                i += 1;
                let ch = *pattern.get(i).ok_or(ParseError::TrailingBackslash)?;
                class.listed.push(ch);
                new_prev = Some(ch);
            }
            // A `-` between two members forms a range, anywhere else it is literal.
            b'-' if prev.is_some() && !matches!(pattern.get(i + 1), Some(b']') | None) => {
                let start = prev.unwrap_or(b'-');
                // The range start was already listed on its own.
                class.listed.pop();

                i += 1;
                let mut end = pattern[i];
                if end == b'\\' {
                    i += 1;
                    end = *pattern
                        .get(i)
                        .ok_or(ParseError::UnclosedCharacterClass(begin))?;
                }

                if start <= end {
                    class.ranges.push(start..=end);
                } else {
                    class.ranges.push(end..=start);
                }
            }
            ch => {
                class.listed.push(ch);
                new_prev = Some(ch);
            }
        }
        prev = new_prev;
        i += 1;
    }

    Err(ParseError::UnclosedCharacterClass(begin))
}

fn named_class(name: &[u8], begin: usize) -> Result<fn(u8) -> bool, ParseError> {
    let func: fn(u8) -> bool = match name {
        b"alnum" => |b| b.is_ascii_alphanumeric(),
        b"alpha" => |b| b.is_ascii_alphabetic(),
        b"blank" => |b| b == b' ' || b == b'\t',
        b"cntrl" => |b| b.is_ascii_control(),
        b"digit" => |b| b.is_ascii_digit(),
        b"graph" => |b| b.is_ascii_graphic(),
        b"lower" => |b| b.is_ascii_lowercase(),
        b"print" => |b| (0x20..0x7f).contains(&b),
        b"punct" => |b| b.is_ascii_punctuation(),
        b"space" => |b| b.is_ascii_whitespace(),
        b"upper" => |b| b.is_ascii_uppercase(),
        b"xdigit" => |b| b.is_ascii_hexdigit(),
        _ => return Err(ParseError::MalformedNamedCharacterClass(begin)),
    };
    Ok(func)
}

fn starts_with(text: &[u8], with: &[u8], flags: PatternFlag) -> bool {
    if flags.intersects(PatternFlag::IGNORE_CASE) {
        text.len() >= with.len() && text[..with.len()].eq_ignore_ascii_case(with)
    } else {
        text.starts_with(with)
    }
}

#[test]
fn test_star_stays_in_segment() {
    let pattern = Pattern::path("img/*/a.png").unwrap();
    assert!(pattern.matches("img/2024/a.png"));
    assert!(!pattern.matches("img/2024/06/a.png"));
    assert!(!pattern.matches("img2024/a.png"));
    assert!(!pattern.matches("img/a.png"));
    assert!(pattern.matches("img//a.png"));

    let pattern = Pattern::new("img/*/a.png", PatternFlag::empty()).unwrap();
    assert!(pattern.matches("img/2024/a.png"));
    assert!(pattern.matches("img/2024/06/a.png"));
    assert!(!pattern.matches("img/a.png"));

    let pattern = Pattern::path("*.png").unwrap();
    assert!(pattern.matches("a.png"));
    assert!(pattern.matches(".png"));
    assert!(!pattern.matches("img/a.png"));
    assert!(!pattern.matches("a.png.bak"));
}

#[test]
fn test_star_star() {
    let pattern = Pattern::path("cache/**/thumb.jpg").unwrap();
    assert!(pattern.matches("cache/thumb.jpg"));
    assert!(pattern.matches("cache/a/thumb.jpg"));
    assert!(pattern.matches("cache/a/b/c/thumb.jpg"));
    assert!(!pattern.matches("cachex/thumb.jpg"));
    assert!(!pattern.matches("cache/a/thumb.jpgx"));

    let pattern = Pattern::path("**/raw").unwrap();
    assert!(pattern.matches("raw"));
    assert!(pattern.matches("a/raw"));
    assert!(pattern.matches("a/b/raw"));
    assert!(!pattern.matches("a/braw"));

    let pattern = Pattern::path("tmp/**").unwrap();
    assert!(pattern.matches("tmp/a"));
    assert!(pattern.matches("tmp/a/b.png"));
    assert!(!pattern.matches("tmpa/b"));

    // not bounded by slashes, so just a star
    let pattern = Pattern::path("a/b**/c").unwrap();
    assert!(pattern.matches("a/bxx/c"));
    assert!(!pattern.matches("a/bxx/yy/c"));
}

#[test]
fn test_question_mark_and_classes() {
    let pattern = Pattern::path("shot-??.[pj][np]g").unwrap();
    assert!(pattern.matches("shot-01.png"));
    assert!(pattern.matches("shot-ab.jpg"));
    assert!(!pattern.matches("shot-1.png"));
    assert!(!pattern.matches("shot-a/.png"));
    assert!(!pattern.matches("shot-01.gif"));

    let pattern = Pattern::path("v[0-9][!a-z]").unwrap();
    assert!(pattern.matches("v1X"));
    assert!(pattern.matches("v9_"));
    assert!(!pattern.matches("v1x"));
    assert!(!pattern.matches("vx1"));

    let pattern = Pattern::path("[]a]").unwrap();
    assert!(pattern.matches("]"));
    assert!(pattern.matches("a"));
    assert!(!pattern.matches("b"));

    let pattern = Pattern::path("[a-]").unwrap();
    assert!(pattern.matches("-"));
    assert!(pattern.matches("a"));

    let pattern = Pattern::path("[z-a]").unwrap();
    assert!(pattern.matches("m"));

    let pattern = Pattern::path("[[:digit:][:upper:]]x").unwrap();
    assert!(pattern.matches("7x"));
    assert!(pattern.matches("Qx"));
    assert!(!pattern.matches("qx"));
}

#[test]
fn test_ignore_case() {
    let pattern = Pattern::new(
        "IMG_[[:digit:]]*.[j]PG",
        PatternFlag::PATH_NAME | PatternFlag::IGNORE_CASE,
    )
    .unwrap();
    assert!(pattern.matches("IMG_1234.JPG"));
    assert!(pattern.matches("img_1234.jpg"));
    assert!(pattern.matches("Img_1.jPg"));
    assert!(!pattern.matches("img_x.jpg"));

    let pattern = Pattern::new("[[:upper:]]", PatternFlag::IGNORE_CASE).unwrap();
    assert!(pattern.matches("a"));
    assert!(pattern.matches("A"));
}

#[test]
fn test_escapes_and_trailing_slashes() {
    let pattern = Pattern::path("a\\*b").unwrap();
    assert!(pattern.matches("a*b"));
    assert!(!pattern.matches("axb"));

    let pattern = Pattern::path("tmp/").unwrap();
    assert_eq!(pattern.as_str(), "tmp/");
    assert!(pattern.matches("tmp"));
    assert!(!pattern.matches("tmp/"));

    let pattern = Pattern::path("//").unwrap();
    assert!(pattern.matches("/"));
}

#[test]
fn test_parse_errors() {
    assert_eq!(
        Pattern::path("[abc").unwrap_err(),
        ParseError::UnclosedCharacterClass(0)
    );
    assert_eq!(
        Pattern::path("*.[png").unwrap_err(),
        ParseError::UnclosedCharacterClass(2)
    );
    assert_eq!(
        Pattern::path("[]").unwrap_err(),
        ParseError::UnclosedCharacterClass(0)
    );
    assert_eq!(
        Pattern::path("[a-").unwrap_err(),
        ParseError::UnclosedCharacterClass(0)
    );
    assert_eq!(
        Pattern::path("abc\\").unwrap_err(),
        ParseError::TrailingBackslash
    );
    assert_eq!(
        Pattern::path("a\0b").unwrap_err(),
        ParseError::NulByteError
    );
    assert_eq!(
        Pattern::path("[[:digits:]]").unwrap_err(),
        ParseError::MalformedNamedCharacterClass(0)
    );
    assert_eq!(
        ParseError::UnclosedCharacterClass(3).to_string(),
        "unclosed character class in pattern, starting at byte 3"
    );
}

#[test]
fn test_exhausted_text() {
    let pattern = Pattern::path("/he[^yx]/**/you").unwrap();
    assert!(pattern.matches("/hez/asdf/you"));
    let wrong = b"/hez/";
    for i in 0..wrong.len() {
        assert!(!pattern.matches(&wrong[..i]));
    }

    let pattern = Pattern::path("a*b*c").unwrap();
    assert!(pattern.matches("axxbxxc"));
    assert!(!pattern.matches("axxbxxcxx"));
    assert!(pattern.matches("axxbxxbxxcxxc"));
}

#[test]
fn test_empty_pattern() {
    let pattern = Pattern::path("").unwrap();
    assert_eq!(pattern.as_str(), "");
    assert!(pattern.matches(""));
    assert!(!pattern.matches("a"));
    assert!(!pattern.matches("/"));
}

#[test]
fn test_source_text_and_flags() {
    let pattern: Pattern = "img/*.[pP][nN][gG]/".parse().unwrap();
    assert_eq!(pattern.flags(), PatternFlag::PATH_NAME);
    assert_eq!(pattern.to_string(), "img/*.[pP][nN][gG]/");
    assert!(pattern.matches("img/a.PNG"));
    assert!(!pattern.matches("img/sub/a.png"));

    assert_eq!(
        "[abc".parse::<Pattern>().unwrap_err(),
        ParseError::UnclosedCharacterClass(0)
    );

    let pattern = Pattern::new("a?", PatternFlag::IGNORE_CASE).unwrap();
    assert_eq!(pattern.flags(), PatternFlag::IGNORE_CASE);
    assert!(pattern.matches("A/"));
}
