use glob::glob;

/// Index of the wildcard slot in an argument list: the LAST argument
/// containing `*` or `?`. Only one slot per command ever expands; earlier
/// glob-looking arguments are handed to the command literally.
pub fn wildcard_index(args: &[String]) -> Option<usize> {
    args.iter()
        .rposition(|arg| arg.contains('*') || arg.contains('?'))
}

/// Expand a glob pattern against the filesystem, in glob's sorted order.
/// No match, or a pattern glob refuses to parse, yields an empty list; the
/// caller substitutes zero arguments in that case.
pub fn expand(pattern: &str) -> Vec<String> {
    match glob(pattern) {
        Ok(paths) => paths
            .filter_map(Result::ok)
            .map(|path| path.to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_glob_characters_means_no_slot() {
        assert_eq!(wildcard_index(&args(&["cp", "a.c", "b.c"])), None);
    }

    #[test]
    fn last_glob_argument_is_selected() {
        assert_eq!(wildcard_index(&args(&["cp", "*.c", "*.h", "dest"])), Some(2));
    }

    #[test]
    fn question_mark_counts_as_glob() {
        assert_eq!(wildcard_index(&args(&["ls", "file?.txt"])), Some(1));
    }

    fn fixture_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("minish-expand-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for name in ["a.c", "b.c", "x.h"] {
            fs::write(dir.join(name), "").unwrap();
        }
        dir
    }

    #[test]
    fn expand_matches_and_sorts() {
        let dir = fixture_dir();
        let matches = expand(&format!("{}/*.c", dir.display()));
        assert_eq!(matches.len(), 2);
        assert!(matches[0].ends_with("a.c"));
        assert!(matches[1].ends_with("b.c"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn expand_without_matches_is_empty() {
        assert!(expand("/no-such-directory-anywhere/*.zz").is_empty());
    }
}
