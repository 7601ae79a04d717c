//! Diagram source normalization
//!
//! Cleans model-produced PlantUML before it is stored or rendered:
//! removes directives disallowed for sandboxed rendering, repairs a known
//! malformed use-case shorthand, and enforces the start/end markers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bare skeleton used when no diagram source is available at all
pub const EMPTY_DIAGRAM: &str = "@startuml\n@enduml";

/// Line prefixes removed from generated diagram source
///
/// `!include` can pull arbitrary files on the rendering server; `POOL`,
/// `LANE` and bare `[` are constructs models emit that PlantUML rejects.
pub const DISALLOWED_PREFIXES: [&str; 4] = ["!include", "POOL", "LANE", "["];

// Pattern -> replacement pairs applied by `fix_known_syntax`. Replacements
// use named capture groups from the pattern.
static FIXUPS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    let mut table = Vec::new();
    // A quoted label followed by `as Alias` without an element keyword:
    // models write `("Approve request") as UC_Approve`, PlantUML wants
    // `usecase UC_Approve as "Approve request"`.
    if let Ok(re) =
        Regex::new(r#"(?m)^\s*\("(?P<label>.*?)"\)\s+as\s+(?P<alias>[A-Za-z0-9_]+)\s*$"#)
    {
        table.push((re, r#"usecase ${alias} as "${label}""#));
    }
    table
});

static FENCED_PLANTUML: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?s)```plantuml\s*\n(.*?)```").ok());

/// Rewrite known malformed syntax produced by generation models
#[must_use]
pub fn fix_known_syntax(source: &str) -> String {
    let mut fixed = source.to_string();
    for (pattern, replacement) in FIXUPS.iter() {
        fixed = pattern.replace_all(&fixed, *replacement).into_owned();
    }
    fixed
}

/// Drop lines whose trimmed form starts with a disallowed prefix
#[must_use]
pub fn strip_disallowed(source: &str) -> String {
    let kept: Vec<&str> = source
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !DISALLOWED_PREFIXES
                .iter()
                .any(|prefix| trimmed.starts_with(prefix))
        })
        .collect();
    kept.join("\n").trim().to_string()
}

/// Wrap the source in `@startuml`/`@enduml` markers when missing
#[must_use]
pub fn ensure_markers(source: &str) -> String {
    let mut out = source.to_string();
    if !out.starts_with("@startuml") {
        out = format!("@startuml\n{out}");
    }
    if !out.ends_with("@enduml") {
        out = format!("{out}\n@enduml");
    }
    out
}

/// Whether both markers appear anywhere in the source
#[must_use]
pub fn has_markers(source: &str) -> bool {
    source.contains("@startuml") && source.contains("@enduml")
}

/// Extract diagram source from a fenced ```plantuml block, trimmed
#[must_use]
pub fn extract_fenced(content: &str) -> Option<&str> {
    let re = FENCED_PLANTUML.as_ref()?;
    re.captures(content)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
}

/// Wrap diagram source in a fenced ```plantuml block
#[must_use]
pub fn fenced(source: &str) -> String {
    format!("```plantuml\n{source}\n```")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_keywordless_usecase_line() {
        assert_eq!(
            fix_known_syntax(r#"("Approve request") as UC_Approve"#),
            r#"usecase UC_Approve as "Approve request""#
        );
    }

    #[test]
    fn rewrites_inside_larger_diagram() {
        let source = "@startuml\nactor User\n  (\"View report\") as UC_View\nUser --> UC_View\n@enduml";
        let fixed = fix_known_syntax(source);
        assert!(fixed.contains(r#"usecase UC_View as "View report""#));
        assert!(fixed.contains("actor User"));
    }

    #[test]
    fn leaves_wellformed_lines_alone() {
        let source = "@startuml\nusecase UC_Main as \"Main flow\"\n@enduml";
        assert_eq!(fix_known_syntax(source), source);
    }

    #[test]
    fn strips_disallowed_lines() {
        let source = "!include stdlib\nactor User\n  POOL something\nLANE other\n[Component] x\nUser --> A";
        assert_eq!(strip_disallowed(source), "actor User\nUser --> A");
    }

    #[test]
    fn strip_trims_surrounding_blank_lines() {
        assert_eq!(strip_disallowed("\n\nactor User\n\n"), "actor User");
        assert_eq!(strip_disallowed("!include only"), "");
    }

    #[test]
    fn ensure_markers_wraps_bare_source() {
        assert_eq!(ensure_markers("A -> B"), "@startuml\nA -> B\n@enduml");
    }

    #[test]
    fn ensure_markers_keeps_existing() {
        let source = "@startuml\nA -> B\n@enduml";
        assert_eq!(ensure_markers(source), source);
    }

    #[test]
    fn has_markers_is_contains_based() {
        assert!(has_markers("prefix @startuml body @enduml suffix"));
        assert!(!has_markers("@startuml only"));
    }

    #[test]
    fn extract_fenced_finds_block() {
        let content = "# Diagram\n\n```plantuml\n@startuml\nA->B\n@enduml\n```\n";
        assert_eq!(
            extract_fenced(content),
            Some("@startuml\nA->B\n@enduml")
        );
    }

    #[test]
    fn extract_fenced_missing_block() {
        assert_eq!(extract_fenced("no diagram here"), None);
    }

    #[test]
    fn fenced_roundtrips_through_extract() {
        let source = "@startuml\nA->B\n@enduml";
        assert_eq!(extract_fenced(&fenced(source)), Some(source));
    }
}
