//! Single-wildcard glob matching for entry names.
//!
//! Patterns contain zero or more `*` wildcards, each standing for zero or
//! more arbitrary characters. Literal chunks between wildcards are located
//! with a leftmost search and the cursor never moves backwards, so a chunk
//! that could match in several places always binds to its first occurrence.
//! Some patterns a backtracking glob would accept are therefore rejected.

/// The only special character in a pattern.
pub const WILDCARD: char = '*';

/// Pattern that matches every entry name.
pub const MATCH_ALL: &str = "*";

/// Returns `true` if `candidate` satisfies `pattern`.
///
/// # Examples
///
/// ```
/// use tarsift_core::pattern::matches;
///
/// assert!(matches("*.json", "etc/config.json"));
/// assert!(matches("/usr/bin/*", "/usr/bin/env"));
/// assert!(matches("*lib*", "usr/lib64/libc.so"));
/// assert!(!matches("usr/*", "/usr/bin/env"));
/// assert!(matches("*", ""));
/// assert!(!matches("", "anything"));
/// ```
#[must_use]
pub fn matches(pattern: &str, candidate: &str) -> bool {
    if pattern.is_empty() {
        return candidate.is_empty();
    }

    let Some((head, last)) = pattern.rsplit_once(WILDCARD) else {
        return pattern == candidate;
    };

    if pattern == MATCH_ALL {
        return true;
    }

    scan_chunks(pattern, head, last, candidate)
}

/// Walks the candidate chunk by chunk. `head` is the pattern up to its last
/// wildcard and `last` the literal after it.
fn scan_chunks(pattern: &str, head: &str, last: &str, candidate: &str) -> bool {
    let anchored = !pattern.starts_with(WILDCARD);
    let mut rest = candidate;

    for (index, chunk) in head.split(WILDCARD).enumerate() {
        let Some(found) = rest.find(chunk) else {
            return false;
        };
        if index == 0 && anchored && found != 0 {
            return false;
        }
        rest = &rest[found + chunk.len()..];
    }

    pattern.ends_with(WILDCARD) || rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pattern() {
        assert!(matches("", ""));
        assert!(!matches("", "a"));
        assert!(!matches("", "/"));
    }

    #[test]
    fn test_literal_pattern_is_exact() {
        assert!(matches("etc/passwd", "etc/passwd"));
        assert!(!matches("etc/passwd", "/etc/passwd"));
        assert!(!matches("etc/passwd", "etc/passwd2"));
        assert!(!matches("etc", "etc/"));
    }

    #[test]
    fn test_match_all() {
        assert!(matches("*", ""));
        assert!(matches("*", "usr/bin/env"));
        assert!(matches("*", "./"));
    }

    #[test]
    fn test_suffix_pattern() {
        assert!(matches("*.json", "config.json"));
        assert!(matches("*.json", "a/b/config.json"));
        assert!(matches("*.json", ".json"));
        assert!(!matches("*.json", "readme.md"));
        assert!(!matches("*.json", "config.json.bak"));
    }

    #[test]
    fn test_prefix_pattern() {
        assert!(matches("a/*", "a/b/c.txt"));
        assert!(matches("a/*", "a/"));
        assert!(!matches("a/*", "b/a/c.txt"));
        assert!(matches("/some/*", "/some/file"));
        assert!(!matches("/some/*", "some/file"));
    }

    #[test]
    fn test_infix_pattern() {
        assert!(matches("*foo*", "foo"));
        assert!(matches("*foo*", "xxfooyy"));
        assert!(!matches("*foo*", "fo o"));
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert!(matches("foo*bar", "foobar"));
        assert!(matches("foo*bar", "foo/x/bar"));
        assert!(!matches("foo*bar", "foobarx"));
        assert!(!matches("foo*bar", "xfoobar"));
        // The trailing chunk may not reuse characters consumed by the head.
        assert!(!matches("ab*b", "ab"));
    }

    #[test]
    fn test_adjacent_wildcards() {
        assert!(matches("**", "anything"));
        assert!(matches("a**b", "ab"));
        assert!(matches("a**b", "a-b"));
        assert!(!matches("a**b", "ba"));
    }

    #[test]
    fn test_leftmost_binding() {
        assert!(matches("*a*a*", "aaa"));
        assert!(matches("*a*a*", "aa"));
        assert!(!matches("*a*a*", "a"));
        assert!(matches("a*a", "aa"));
        assert!(!matches("a*a", "a"));
    }

    #[test]
    fn test_middle_chunks_in_order() {
        assert!(matches("usr/*/bin/*.so", "usr/local/bin/libx.so"));
        assert!(!matches("usr/*/bin/*.so", "usr/bin/local/libx.so"));
        assert!(matches("*b/*c", "ab/xc"));
        assert!(!matches("*b/*b/c", "b/c/b/d"));
    }

    #[test]
    fn test_multibyte_candidates() {
        assert!(matches("*ü*", "über/grün"));
        assert!(matches("данные/*", "данные/файл"));
        assert!(!matches("*ß", "strasse"));
    }
}
