//! Client-side extension check that runs before any archiving or network work.

use super::error::CoreError;
use super::Selection;

/// Sentinel reported for files whose name contains no `.` at all.
pub const NO_EXTENSION: &str = "(no extension)";

/// The fixed allow-list of source, markup, style and data extensions,
/// paired with the language the analysis service reports for them.
pub const ALLOWED_EXTENSIONS: &[(&str, &str)] = &[
    ("py", "Python"),
    ("js", "JavaScript"),
    ("java", "Java"),
    ("c", "C"),
    ("cpp", "C++"),
    ("cc", "C++"),
    ("cxx", "C++"),
    ("cs", "C#"),
    ("go", "Go"),
    ("rs", "Rust"),
    ("ts", "TypeScript"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("sql", "SQL"),
    ("ex", "Elixir"),
    ("exs", "Elixir"),
    ("json", "JSON"),
    ("node", "Node"),
];

/// Result of checking a selection against the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted(Selection),
    /// Offending extensions, deduplicated, in first-seen order.
    Rejected(Vec<String>),
}

impl ValidationOutcome {
    /// Converts the outcome into the pipeline's error type, listing the
    /// allowed extensions alongside the rejected ones.
    pub fn into_result(self) -> Result<Selection, CoreError> {
        match self {
            ValidationOutcome::Accepted(selection) => Ok(selection),
            ValidationOutcome::Rejected(invalid) => Err(CoreError::UnsupportedExtensions {
                invalid,
                allowed: allowed_extensions(),
            }),
        }
    }
}

/// The allow-list as owned strings, in declaration order.
pub fn allowed_extensions() -> Vec<String> {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|(ext, _)| ext.to_string())
        .collect()
}

/// Looks up the language label for an extension, case-insensitively.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.to_lowercase();
    ALLOWED_EXTENSIONS
        .iter()
        .find(|(allowed, _)| *allowed == ext)
        .map(|(_, language)| *language)
}

/// Lowercased suffix after the last `.` of the final path segment,
/// or [`NO_EXTENSION`] if the name has none.
pub fn extension_of(relative_path: &str) -> String {
    let name = relative_path.rsplit('/').next().unwrap_or(relative_path);
    match name.rfind('.') {
        Some(idx) => name[idx + 1..].to_lowercase(),
        None => NO_EXTENSION.to_string(),
    }
}

/// Checks every entry of `selection` against [`ALLOWED_EXTENSIONS`].
pub fn validate(selection: Selection) -> ValidationOutcome {
    let mut invalid: Vec<String> = Vec::new();
    for entry in selection.entries() {
        let ext = extension_of(entry.relative_path());
        let permitted = language_for_extension(&ext).is_some();
        if !permitted && !invalid.contains(&ext) {
            invalid.push(ext);
        }
    }

    if invalid.is_empty() {
        ValidationOutcome::Accepted(selection)
    } else {
        tracing::info!(
            "Rejected selection of {} files: unsupported extensions {:?}",
            selection.len(),
            invalid
        );
        ValidationOutcome::Rejected(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FileEntry;
    use proptest::prelude::*;

    fn selection_of(paths: &[&str]) -> Selection {
        Selection::new(
            paths
                .iter()
                .map(|p| FileEntry::new(*p, b"x".to_vec()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.py"), "py");
        assert_eq!(extension_of("dir/Main.JAVA"), "java");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("Makefile"), NO_EXTENSION);
        assert_eq!(extension_of("some.dir/README"), NO_EXTENSION);
        assert_eq!(extension_of(".env"), "env");
    }

    #[test]
    fn test_accepts_allowed_extensions_case_insensitively() {
        let selection = selection_of(&["a.py", "web/INDEX.HTML", "lib/x.Rs"]);
        let outcome = validate(selection.clone());
        assert_eq!(outcome, ValidationOutcome::Accepted(selection));
    }

    #[test]
    fn test_rejects_exe() {
        let selection = selection_of(&["ok.py", "x.exe"]);
        let outcome = validate(selection);
        assert_eq!(outcome, ValidationOutcome::Rejected(vec!["exe".to_string()]));
    }

    #[test]
    fn test_rejected_set_is_deduplicated_in_first_seen_order() {
        let selection = selection_of(&["a.exe", "Makefile", "b.EXE", "c.png", "LICENSE"]);
        let outcome = validate(selection);
        assert_eq!(
            outcome,
            ValidationOutcome::Rejected(vec![
                "exe".to_string(),
                NO_EXTENSION.to_string(),
                "png".to_string()
            ])
        );
    }

    #[test]
    fn test_into_result_carries_allow_list() {
        let err = validate(selection_of(&["x.exe"])).into_result().unwrap_err();
        match err {
            CoreError::UnsupportedExtensions { invalid, allowed: listed } => {
                assert_eq!(invalid, vec!["exe"]);
                assert_eq!(listed.len(), 18);
                assert!(listed.contains(&"node".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_language_for_extension() {
        assert_eq!(language_for_extension("CPP"), Some("C++"));
        assert_eq!(language_for_extension("exs"), Some("Elixir"));
        assert_eq!(language_for_extension("exe"), None);
    }

    proptest! {
        #[test]
        fn prop_any_disallowed_extension_rejects(
            good in proptest::collection::vec("[a-z]{1,8}\\.(py|js|rs|go|json)", 0..5),
            bad_ext in "(exe|dll|png|zip|bin|md)",
            insert_at in 0usize..5,
        ) {
            let mut paths: Vec<String> = good;
            let at = insert_at.min(paths.len());
            paths.insert(at, format!("file.{bad_ext}"));
            let entries = paths.iter().map(|p| FileEntry::new(p.clone(), Vec::new())).collect();
            let outcome = validate(Selection::new(entries).unwrap());
            prop_assert_eq!(outcome, ValidationOutcome::Rejected(vec![bad_ext]));
        }
    }
}
