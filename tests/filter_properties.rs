//! Properties every compiled filter upholds, checked over generated paths and pattern lists.

use patternfilter::{FilterOptions, MatchFlag, PatternFilter, PatternFlag, PatternList};
use proptest::prelude::*;

const PATTERN_POOL: &[&str] = &[
    "*.png",
    "*.jpg",
    "*.txt",
    "a*",
    "?.gif",
    "[a-m]*.png",
    "tmp/*",
    "tmp/**",
    "**/cache",
    "src/*/[!x]*",
    "b",
    "_IMAGE_EXTENSIONS_",
];

fn path_strategy() -> impl Strategy<Value = String> {
    "((tmp|src|cache|[a-z]{1,3})/){0,3}[a-z]{1,5}\\.(png|jpg|txt|gif)"
}

fn pattern_list(min: usize) -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(PATTERN_POOL), min..4)
}

proptest! {
    #[test]
    fn excluded_paths_are_never_allowed(
        allowed in pattern_list(0),
        excluded in pattern_list(1),
        path in path_strategy(),
    ) {
        let filter = PatternFilter::compile(&allowed, &excluded).unwrap();
        if filter.is_excluded(&path) {
            prop_assert!(!filter.is_allowed(&path));
        }
    }

    #[test]
    fn exclusion_ignores_the_allowed_list(
        allowed_a in pattern_list(0),
        allowed_b in pattern_list(0),
        excluded in pattern_list(0),
        path in path_strategy(),
    ) {
        let a = PatternFilter::compile(&allowed_a, &excluded).unwrap();
        let b = PatternFilter::compile(&allowed_b, &excluded).unwrap();
        prop_assert_eq!(a.is_excluded(&path), b.is_excluded(&path));
    }

    #[test]
    fn without_exclusions_allowed_means_any_match(
        allowed in pattern_list(1),
        path in path_strategy(),
    ) {
        let filter = PatternFilter::compile(&allowed, [] as [&str; 0]).unwrap();
        let expanded: Vec<&str> = filter.allowed_patterns().collect();
        let list = PatternList::compile(&expanded, PatternFlag::empty(), MatchFlag::empty()).unwrap();

        prop_assert_eq!(filter.is_allowed(&path), list.matches(&path));
        let any_single = expanded
            .iter()
            .any(|p| PatternFilter::compile([*p], [] as [&str; 0]).unwrap().is_allowed(&path));
        prop_assert_eq!(filter.is_allowed(&path), any_single);
    }

    #[test]
    fn queries_are_repeatable(
        allowed in pattern_list(0),
        excluded in pattern_list(0),
        path in path_strategy(),
    ) {
        let filter = PatternFilter::compile_with(
            &allowed,
            &excluded,
            FilterOptions { ignore_case: true, anchored: false },
        )
        .unwrap();
        let first = (filter.is_allowed(&path), filter.is_excluded(&path));
        for _ in 0..3 {
            prop_assert_eq!((filter.is_allowed(&path), filter.is_excluded(&path)), first);
        }
    }

    #[test]
    fn empty_allowed_list_is_the_image_group(path in path_strategy()) {
        let default = PatternFilter::compile([] as [&str; 0], ["tmp/*"]).unwrap();
        let explicit = PatternFilter::compile(["_IMAGE_EXTENSIONS_"], ["tmp/*"]).unwrap();
        prop_assert_eq!(default.is_allowed(&path), explicit.is_allowed(&path));
    }
}
