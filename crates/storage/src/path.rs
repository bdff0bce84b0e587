//! Traversal-safe path resolution.

use crate::error::StorageError;

/// Join `root` and `name` into the absolute object path the remote API
/// expects.
///
/// A bare separator is treated as the empty name. All backslashes are
/// normalized to forward slashes. Empty and `.` segments are dropped;
/// `..` may consume previously accepted segments of `name` but can never
/// climb above the root.
pub(crate) fn resolve_path(root: &str, name: &str) -> Result<String, StorageError> {
    let trimmed = if name == "/" || name == "\\" { "" } else { name };
    let normalized = trimmed.replace('\\', "/");

    let mut segments: Vec<&str> = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(StorageError::PathTraversal {
                        name: name.to_string(),
                    });
                }
            }
            other => segments.push(other),
        }
    }

    let root = root.replace('\\', "/");
    let base = root.trim_end_matches('/');
    if segments.is_empty() {
        return Ok(if base.is_empty() {
            "/".to_string()
        } else {
            base.to_string()
        });
    }
    Ok(format!("{base}/{}", segments.join("/")))
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Property: resolution never produces a path outside the configured
    // root. Any input either resolves under the root or is rejected.
    proptest! {
        #[test]
        fn prop_resolved_path_stays_under_root(
            name in r"[a-zA-Z0-9_./\\-]{0,60}",
        ) {
            let root = "/media/";
            match resolve_path(root, &name) {
                Ok(resolved) => {
                    prop_assert!(
                        resolved == "/media" || resolved.starts_with("/media/"),
                        "escaped root: {resolved}"
                    );
                    prop_assert!(!resolved.contains('\\'));
                    prop_assert!(!resolved.split('/').any(|s| s == ".." || s == "."));
                }
                Err(err) => {
                    prop_assert!(
                        matches!(err, StorageError::PathTraversal { .. }),
                        "expected PathTraversal, got {err:?}"
                    );
                }
            }
        }
    }

    // Property: resolution is idempotent - resolving an already resolved
    // path relative to the root changes nothing.
    proptest! {
        #[test]
        fn prop_resolution_idempotent(name in "[a-zA-Z0-9_-]{1,12}(/[a-zA-Z0-9_-]{1,12}){0,3}") {
            let root = "/media/";
            let once = resolve_path(root, &name).expect("plain names resolve");
            let relative = once.strip_prefix("/media/").unwrap_or(&once);
            let twice = resolve_path(root, relative).expect("resolved names resolve");
            prop_assert_eq!(once, twice);
        }
    }
}
