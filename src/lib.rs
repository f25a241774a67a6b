//! Allow/exclude path filtering.
//!
//! A [`PatternFilter`] is compiled once from a list of allowed and a list of excluded glob
//! patterns and then answers, for any path string, whether the path should be processed: it must
//! match at least one allowed pattern and no excluded pattern. Exclusion always wins.
//!
//! Patterns use git-style globbing (see [`Pattern`]): `*` and `?` stay within one path component,
//! `**` crosses components, and `[...]` matches one byte out of a class. Unless the filter is
//! anchored, a pattern matches a path if it matches the whole path or any trailing run of its
//! components, so `*.png` matches `img/a.png`.
//!
//! Named tokens expand to predefined pattern groups, see the [`dictionary`] module. An empty
//! allowed list stands for [`IMAGE_EXTENSIONS`].
//!
//! ```
//! # use patternfilter::*;
//! # fn test() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
//! let filter = PatternFilter::compile(["*.png", "*.jpg"], ["tmp/*"])?;
//!
//! assert!(filter.is_allowed("img/a.png"));
//! assert!(!filter.is_allowed("img/a.txt"));
//!
//! // excluded paths are never allowed
//! assert!(!filter.is_allowed("tmp/a.png"));
//! assert!(filter.is_excluded("tmp/a.png"));
//!
//! // no allowed patterns: images only
//! let images = PatternFilter::compile([] as [&str; 0], ["thumbs/**"])?;
//! assert!(images.is_allowed("photo.jpg"));
//! assert!(images.is_allowed("raw/SCAN.TIFF"));
//! assert!(!images.is_allowed("notes.txt"));
//! assert!(!images.is_allowed("thumbs/small/photo.jpg"));
//!
//! // invalid patterns are reported with the list they came from
//! let err = PatternFilter::compile(["*.png"], ["[abc"]).unwrap_err();
//! assert_eq!(err.list(), ListKind::Excluded);
//! assert_eq!(err.pattern(), "[abc");
//! # Ok(())
//! # }
//! # test().unwrap()
//! ```

#[cfg(feature = "serde")]
mod config;
pub mod dictionary;
mod error;
mod filter;
mod match_list;
mod pattern;
mod trace;

#[cfg(feature = "serde")]
#[doc(inline)]
pub use config::FilterConfig;

#[doc(inline)]
pub use dictionary::IMAGE_EXTENSIONS;

#[doc(inline)]
pub use error::{Error, ListKind, Result};

#[doc(inline)]
pub use filter::{FilterOptions, PatternFilter};

#[doc(inline)]
pub use match_list::{MatchEntry, MatchFlag, PatternList};

#[doc(inline)]
pub use pattern::{ParseError, Pattern, PatternFlag};
