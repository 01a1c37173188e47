//! Lexical helpers for workspace-relative linux paths.
//!
//! Paths here never touch the filesystem; they are compared as strings
//! against bitmap entries.

/// Joins `relative` onto `base` and resolves `.` and `..` segments
pub fn join_normalize(base: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let joined = if relative.starts_with('/') {
        relative.to_string()
    } else {
        format!("{}/{}", base, relative)
    };
    for segment in joined.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Path of `to` relative to the directory `from`
pub fn relative(from: &str, to: &str) -> String {
    let from_segments: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segments: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();
    let common = from_segments
        .iter()
        .zip(to_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut result: Vec<&str> = vec![".."; from_segments.len() - common];
    result.extend(&to_segments[common..]);
    result.join("/")
}

/// Whether `path` is `dir` itself or lies under it
pub fn is_within(dir: &str, path: &str) -> bool {
    let dir = dir.trim_end_matches('/');
    dir.is_empty() || path == dir || path.starts_with(&format!("{}/", dir))
}

/// Extension of the last path segment, including the leading dot
pub fn extension(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&file_name[idx..]),
    }
}

pub fn remove_extension(path: &str) -> &str {
    match extension(path) {
        Some(ext) => &path[..path.len() - ext.len()],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_normalize() {
        assert_eq!(
            join_normalize("components/button", "../utils/index.ts"),
            "components/utils/index.ts"
        );
        assert_eq!(join_normalize("", "./index.ts"), "index.ts");
        assert_eq!(join_normalize("a/b", "c\\d.ts"), "a/b/c/d.ts");
    }

    #[test]
    fn test_relative() {
        assert_eq!(relative("components/utils", "components/utils/is-string.ts"), "is-string.ts");
        assert_eq!(relative("a/b", "a/c/d.ts"), "../c/d.ts");
    }

    #[test]
    fn test_is_within() {
        assert!(is_within("components/utils", "components/utils/index.ts"));
        assert!(!is_within("components/utils", "components/utils-extra/index.ts"));
        assert!(is_within("", "anything.ts"));
    }

    #[test]
    fn test_extension_handling() {
        assert_eq!(extension("src/index.spec.ts"), Some(".ts"));
        assert_eq!(extension("src/.eslintrc"), None);
        assert_eq!(extension("src/Makefile"), None);
        assert_eq!(remove_extension("src/index.js"), "src/index");
        assert_eq!(remove_extension("src/index"), "src/index");
    }
}
