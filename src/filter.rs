//! The allow/exclude filter.

use crate::dictionary::{self, IMAGE_EXTENSIONS};
use crate::error::{Error, ListKind, Result};
use crate::trace;
use crate::{MatchFlag, PatternFlag, PatternList};

/// Knobs applied to every pattern of a filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Ignore ascii letter case when matching.
    pub ignore_case: bool,

    /// Only match whole paths. By default a pattern also matches any trailing run of path
    /// components, so `*.png` matches `img/a.png`.
    pub anchored: bool,
}

impl FilterOptions {
    fn pattern_flags(self) -> PatternFlag {
        if self.ignore_case {
            PatternFlag::IGNORE_CASE
        } else {
            PatternFlag::empty()
        }
    }

    fn match_flags(self) -> MatchFlag {
        if self.anchored {
            MatchFlag::ANCHORED
        } else {
            MatchFlag::empty()
        }
    }
}

/// Decides whether a path should be processed, given a list of allowed and a list of excluded
/// patterns. Exclusion always wins.
///
/// A filter is immutable once compiled and can be shared freely between threads.
#[derive(Clone, Debug)]
pub struct PatternFilter {
    allowed: PatternList,
    excluded: PatternList,
    options: FilterOptions,
}

impl PatternFilter {
    /// Compile a filter from raw pattern lists.
    ///
    /// Named tokens such as [`IMAGE_EXTENSIONS`] are expanded first. An empty `allowed` list
    /// means [`IMAGE_EXTENSIONS`]. Every pattern is validated here, the first invalid one is
    /// reported together with the list it came from.
    pub fn compile<A, E, S, T>(allowed: A, excluded: E) -> Result<Self>
    where
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
        E: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self::compile_with(allowed, excluded, FilterOptions::default())
    }

    /// Like [`compile`](PatternFilter::compile), with explicit options.
    pub fn compile_with<A, E, S, T>(allowed: A, excluded: E, options: FilterOptions) -> Result<Self>
    where
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
        E: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut allowed = dictionary::translate(allowed);
        let excluded = dictionary::translate(excluded);

        if allowed.is_empty() {
            allowed = dictionary::translate([IMAGE_EXTENSIONS]);
        }

        let filter = Self {
            allowed: compile_list(ListKind::Allowed, &allowed, options)?,
            excluded: compile_list(ListKind::Excluded, &excluded, options)?,
            options,
        };
        trace::trace_filter_compiled(filter.allowed.len(), filter.excluded.len());
        Ok(filter)
    }

    /// Like [`compile`](PatternFilter::compile) but panics if a pattern is invalid.
    ///
    /// Meant for pattern lists fixed at build time, where an invalid pattern is a programming
    /// error. Never feed it user input.
    ///
    /// # Panics
    ///
    /// If any pattern fails to compile.
    pub fn must_compile<A, E, S, T>(allowed: A, excluded: E) -> Self
    where
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
        E: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        match Self::compile(allowed, excluded) {
            Ok(filter) => filter,
            Err(err) => panic!("filter: compile(): {err}"),
        }
    }

    /// Whether `path` matches an allowed pattern and no excluded pattern.
    pub fn is_allowed<P: AsRef<str>>(&self, path: P) -> bool {
        let path = path.as_ref();
        let matched = self.allowed.first_match(path);
        let excluded = matched.is_some() && self.is_excluded(path);
        let allowed = matched.is_some() && !excluded;

        trace::trace_filter_decision(
            path,
            allowed,
            excluded,
            matched.map(|entry| entry.pattern().as_str()),
        );
        allowed
    }

    /// Whether `path` matches an excluded pattern.
    ///
    /// Independent of the allowed list, so a directory walker can use it to skip whole subtrees.
    pub fn is_excluded<P: AsRef<str>>(&self, path: P) -> bool {
        self.excluded.matches(path.as_ref())
    }

    /// The allowed patterns after token expansion, in evaluation order.
    pub fn allowed_patterns(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(|entry| entry.pattern().as_str())
    }

    /// The excluded patterns after token expansion, in evaluation order.
    pub fn excluded_patterns(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(|entry| entry.pattern().as_str())
    }

    /// The options this filter was compiled with.
    pub fn options(&self) -> FilterOptions {
        self.options
    }
}

fn compile_list(list: ListKind, patterns: &[String], options: FilterOptions) -> Result<PatternList> {
    PatternList::compile(patterns, options.pattern_flags(), options.match_flags()).map_err(
        |(pattern, err)| {
            trace::trace_pattern_rejected(list, &pattern, &err);
            Error::invalid_pattern(list, pattern, err)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseError;

    const NONE: [&str; 0] = [];

    #[test]
    fn end_to_end() {
        let filter = PatternFilter::compile(["*.png", "*.jpg"], ["tmp/*"]).unwrap();

        assert!(!filter.is_allowed("tmp/a.png"));
        assert!(filter.is_allowed("img/a.png"));
        assert!(!filter.is_allowed("img/a.txt"));
        assert!(filter.is_excluded("tmp/a.png"));
        assert!(filter.is_excluded("tmp/a.txt"));
        assert!(!filter.is_excluded("img/a.png"));
    }

    #[test]
    fn empty_allowed_means_images() {
        let filter = PatternFilter::compile(NONE, NONE).unwrap();

        assert!(filter.is_allowed("photo.jpg"));
        assert!(filter.is_allowed("holiday/PHOTO.JPEG"));
        assert!(filter.is_allowed("scan.tiff"));
        assert!(!filter.is_allowed("notes.txt"));
        assert!(!filter.is_excluded("notes.txt"));
        assert_eq!(
            filter.allowed_patterns().collect::<Vec<_>>(),
            dictionary::lookup(IMAGE_EXTENSIONS).unwrap()
        );
        assert_eq!(filter.excluded_patterns().count(), 0);
    }

    #[test]
    fn tokens_expand_in_both_lists() {
        let filter =
            PatternFilter::compile(["*.txt", IMAGE_EXTENSIONS], [IMAGE_EXTENSIONS]).unwrap();
        let images = dictionary::lookup(IMAGE_EXTENSIONS).unwrap();

        assert_eq!(filter.allowed_patterns().count(), images.len() + 1);
        assert_eq!(filter.allowed_patterns().next(), Some("*.txt"));
        assert_eq!(filter.excluded_patterns().collect::<Vec<_>>(), images);
        assert!(filter.is_allowed("notes.txt"));
        assert!(!filter.is_allowed("photo.png"));
        assert!(filter.is_excluded("photo.png"));
    }

    #[test]
    fn invalid_patterns_name_their_list() {
        let err = PatternFilter::compile(["*.png", "[abc"], NONE).unwrap_err();
        assert_eq!(err.list(), ListKind::Allowed);
        assert_eq!(err.pattern(), "[abc");
        assert!(err.to_string().starts_with("include patterns are invalid"));

        let err = PatternFilter::compile(["*.png"], ["ok/*", "[abc"]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidPattern {
                list: ListKind::Excluded,
                pattern: "[abc".to_string(),
                source: ParseError::UnclosedCharacterClass(0),
            }
        );
        assert!(err.to_string().starts_with("exclude patterns are invalid"));

        // the allowed list is checked first
        let err = PatternFilter::compile(["[x"], ["[abc"]).unwrap_err();
        assert_eq!(err.list(), ListKind::Allowed);
    }

    #[test]
    fn options_apply_to_every_pattern() {
        let options = FilterOptions {
            ignore_case: true,
            anchored: false,
        };
        let filter = PatternFilter::compile_with(["*.png"], ["TMP/*"], options).unwrap();
        assert!(filter.is_allowed("A.PNG"));
        assert!(!filter.is_allowed("tmp/A.PNG"));
        assert_eq!(filter.options(), options);

        let options = FilterOptions {
            ignore_case: false,
            anchored: true,
        };
        let filter = PatternFilter::compile_with(["*.png", "img/*.png"], NONE, options).unwrap();
        assert!(filter.is_allowed("a.png"));
        assert!(filter.is_allowed("img/a.png"));
        assert!(!filter.is_allowed("other/a.png"));
        assert!(!filter.is_allowed("A.PNG"));
    }

    #[test]
    fn empty_path_and_empty_pattern() {
        let loose = PatternFilter::compile(["*"], NONE).unwrap();
        let anchored = PatternFilter::compile_with(
            ["*"],
            NONE,
            FilterOptions {
                ignore_case: false,
                anchored: true,
            },
        )
        .unwrap();
        assert!(loose.is_allowed(""));
        assert_eq!(loose.is_allowed(""), anchored.is_allowed(""));

        let filter = PatternFilter::compile(["*.png"], ["*"]).unwrap();
        assert!(filter.is_excluded(""));
        assert!(filter.is_excluded("a.png"));
        assert!(!filter.is_allowed("a.png"));

        let filter = PatternFilter::compile([""], [""]).unwrap();
        assert!(filter.is_excluded(""));
        assert!(!filter.is_excluded("a"));
        assert!(!filter.is_allowed(""));
        assert!(!filter.is_allowed("a"));
    }

    #[test]
    fn must_compile_accepts_valid_lists() {
        let filter = PatternFilter::must_compile(["*.gif"], ["cache/**"]);
        assert!(filter.is_allowed("anim.gif"));
        assert!(!filter.is_allowed("cache/thumbs/anim.gif"));
    }

    #[test]
    #[should_panic(expected = "filter: compile(): exclude patterns are invalid")]
    fn must_compile_panics_on_invalid_pattern() {
        PatternFilter::must_compile(["*.gif"], ["[abc"]);
    }

    #[test]
    fn filter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PatternFilter>();
    }
}
