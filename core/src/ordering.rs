//! Case-insensitive option-name ordering used to sort tables and to bound
//! the candidate search during parsing.

use std::cmp::Ordering;

/// Compares two option names ASCII-case-insensitively.
///
/// Unlike plain lexicographic order, a name that is a proper prefix of the
/// other sorts *after* it: `"foo:"` < `"foo"` and `"Ipath"` < `"I"`. With
/// this order, every option whose name is a prefix of some text sorts at or
/// after that text, so a lower bound on the text never skips a candidate.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use opt_table_core::compare_name_ignore_case;
///
/// assert_eq!(compare_name_ignore_case("Foo", "foo"), Ordering::Equal);
/// assert_eq!(compare_name_ignore_case("bar", "foo"), Ordering::Less);
/// assert_eq!(compare_name_ignore_case("foo", "foobar"), Ordering::Greater);
/// assert_eq!(compare_name_ignore_case("foobar", "foo"), Ordering::Less);
/// ```
pub fn compare_name_ignore_case(a: &str, b: &str) -> Ordering {
    let mut lhs = a.chars().map(|c| c.to_ascii_lowercase());
    let mut rhs = b.chars().map(|c| c.to_ascii_lowercase());
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return Ordering::Equal,
            // `a` is a prefix of `b`.
            (None, Some(_)) => return Ordering::Greater,
            // `b` is a prefix of `a`.
            (Some(_), None) => return Ordering::Less,
            (Some(x), Some(y)) if x != y => return x.cmp(&y),
            _ => {}
        }
    }
}

/// Returns the first index in `items[start..]` whose key is not less than
/// `value` under [`compare_name_ignore_case`] (a lower bound / weak
/// predecessor). `items[start..]` must be sorted by that order.
pub(crate) fn weak_predecessor<T>(
    items: &[T],
    start: usize,
    value: &str,
    key: impl Fn(&T) -> &str,
) -> usize {
    start
        + items[start..]
            .partition_point(|item| compare_name_ignore_case(key(item), value) == Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_is_ignored() {
        assert_eq!(compare_name_ignore_case("ABC", "abc"), Ordering::Equal);
        assert_eq!(compare_name_ignore_case("abd", "ABC"), Ordering::Greater);
    }

    #[test]
    fn test_prefix_sorts_after_extension() {
        assert_eq!(compare_name_ignore_case("I", "Iquote"), Ordering::Greater);
        assert_eq!(compare_name_ignore_case("Iquote", "I"), Ordering::Less);
        assert_eq!(compare_name_ignore_case("", "x"), Ordering::Greater);
    }

    #[test]
    fn test_sort_is_total_and_groups_prefixes_after_extensions() {
        let mut names = vec!["I", "out=", "Iquote", "foo", "foo:", "bar", "o"];
        names.sort_by(|a, b| compare_name_ignore_case(a, b));
        assert_eq!(names, vec!["bar", "foo:", "foo", "Iquote", "I", "out=", "o"]);
    }

    #[test]
    fn test_weak_predecessor_keeps_prefix_candidates() {
        let names = vec!["bar", "foo:", "foo", "Iquote", "I", "o"];
        // Everything that could be a prefix of "foo:x" starts at or after the bound.
        let idx = weak_predecessor(&names, 0, "foo:x", |n| n);
        assert_eq!(idx, 1);
        let idx = weak_predecessor(&names, 0, "Ipath", |n| n);
        assert_eq!(names[idx], "Iquote");
        assert!(names[idx..].contains(&"I"));
        let idx = weak_predecessor(&names, 0, "zzz", |n| n);
        assert_eq!(idx, names.len());
    }

    #[test]
    fn test_weak_predecessor_respects_start() {
        let names = vec!["<unknown>", "bar", "foo"];
        assert_eq!(weak_predecessor(&names, 1, "a", |n| n), 1);
        assert_eq!(weak_predecessor(&names, 1, "bar", |n| n), 1);
        assert_eq!(weak_predecessor(&names, 1, "c", |n| n), 2);
    }
}
