/// Vocabulary entries starting with `prefix`, ignoring case
///
/// Vocabulary order is kept. When nothing matches, the prefix itself is the
/// only suggestion, so committing inserts the text as typed.
pub fn prefix_matches<S: AsRef<str>>(vocabulary: &[S], prefix: &str) -> Vec<String> {
    let needle = prefix.to_lowercase();
    let matches: Vec<String> = vocabulary
        .iter()
        .map(AsRef::as_ref)
        .filter(|candidate| candidate.to_lowercase().starts_with(&needle))
        .map(str::to_owned)
        .collect();

    if matches.is_empty() {
        vec![prefix.to_owned()]
    } else {
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(&["Apple", "banana"], "AP", &["Apple"])]
    #[case(&["world", "word", "work"], "wor", &["world", "word", "work"])]
    #[case(&["world", "word", "work"], "WORL", &["world"])]
    #[case(&["work", "world"], "wo", &["work", "world"])]
    #[case(&["alpha", "beta"], "gam", &["gam"])]
    #[case(&[], "Xy", &["Xy"])]
    fn test_prefix_matches(#[case] vocabulary: &[&str], #[case] prefix: &str, #[case] expected: &[&str]) {
        assert_eq!(prefix_matches(vocabulary, prefix), expected);
    }

    #[test]
    fn test_fallback_keeps_prefix_case() {
        assert_eq!(prefix_matches(&["alpha"], "ZeTa"), vec!["ZeTa".to_string()]);
    }

    #[test]
    fn test_result_is_never_empty() {
        let vocabulary = ["one", "two", "three"];
        for prefix in ["", "o", "tw", "x", "THREE", "threes"] {
            assert!(!prefix_matches(&vocabulary, prefix).is_empty(), "prefix {prefix:?}");
        }
    }
}
