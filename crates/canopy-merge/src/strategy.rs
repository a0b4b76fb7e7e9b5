//! Per-file update decisions.

use crate::blocks::extract_blocks;
use crate::merge::{merge_with_report, report_unterminated};
use canopy_core::diagnostics::Diagnostics;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// What to do with one generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateAction {
    /// No previous file.
    Create,
    /// Previous file is equivalent, or holds a user block that is never
    /// closed; leave it alone.
    Skip,
    /// Previous file has user blocks; carry them over.
    Merge,
    /// Previous file has no user blocks; replace it.
    Overwrite,
}

static GENERATED_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*//[^\n]*@generated[^\n]*$").expect("generated header pattern is valid"));

/// Text with `@generated` comment lines blanked and whitespace collapsed.
pub fn normalize_generated(text: &str) -> String {
    let stripped = GENERATED_HEADER.replace_all(text, "// @generated");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn decide_update(previous: Option<&str>, fresh: &str) -> UpdateAction {
    let Some(previous) = previous else {
        return UpdateAction::Create;
    };
    let scan = extract_blocks(previous);
    if normalize_generated(previous) == normalize_generated(fresh) || scan.unterminated.is_some() {
        UpdateAction::Skip
    } else if scan.has_blocks() {
        UpdateAction::Merge
    } else {
        UpdateAction::Overwrite
    }
}

/// The decision for one file and the content to write, if any.
#[derive(Debug, Clone)]
pub struct PlannedUpdate {
    pub action: UpdateAction,
    pub content: Option<String>,
    pub diagnostics: Diagnostics,
}

pub fn plan_update(previous: Option<&str>, fresh: &str) -> PlannedUpdate {
    let action = decide_update(previous, fresh);
    let mut diagnostics = Diagnostics::new();
    let content = match (action, previous) {
        (UpdateAction::Skip, Some(previous)) => {
            report_unterminated(&extract_blocks(previous), "previous", &mut diagnostics);
            None
        }
        (UpdateAction::Merge, Some(previous)) => {
            let report = merge_with_report(previous, fresh);
            diagnostics.extend(report.diagnostics);
            Some(report.text)
        }
        _ => Some(fresh.to_string()),
    };
    PlannedUpdate { action, content, diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::diagnostics::DiagnosticCode;

    #[test]
    fn test_decisions() {
        let fresh = "// @generated by canopy at 2026-10-19T10:00:00Z\nexport const a = 1;\n";
        assert_eq!(decide_update(None, fresh), UpdateAction::Create);

        let same = "// @generated by canopy at 2026-10-18T09:00:00Z\nexport const a  =  1;";
        assert_eq!(decide_update(Some(same), fresh), UpdateAction::Skip);

        let edited = "export const a = 2;\n// @canopy-user-start\nx();\n// @canopy-user-end\n";
        assert_eq!(decide_update(Some(edited), fresh), UpdateAction::Merge);

        assert_eq!(decide_update(Some("export const a = 2;"), fresh), UpdateAction::Overwrite);
    }

    #[test]
    fn test_plan_merge_content() {
        let previous = "// @canopy-user-start logic\nx();\n// @canopy-user-end\n";
        let fresh = "a\n// @canopy-user-start logic\n// @canopy-user-end\n";
        let plan = plan_update(Some(previous), fresh);
        assert_eq!(plan.action, UpdateAction::Merge);
        assert_eq!(plan.content.as_deref(), Some("a\n// @canopy-user-start logic\nx();\n// @canopy-user-end\n"));
    }

    #[test]
    fn test_plan_skip_writes_nothing() {
        let plan = plan_update(Some("a"), "a\n");
        assert_eq!(plan.action, UpdateAction::Skip);
        assert!(plan.content.is_none());
    }

    #[test]
    fn test_unclosed_user_block_is_left_alone() {
        let previous = "export function Menu() {\n  // @canopy-user-start logic\n  const [open, setOpen] = useState(false);\n  return <nav />;\n}\n";
        let fresh = "export function Menu() {\n  // @canopy-user-start logic\n  // @canopy-user-end\n  return <nav />;\n}\n";
        assert_eq!(decide_update(Some(previous), fresh), UpdateAction::Skip);

        let plan = plan_update(Some(previous), fresh);
        assert_eq!(plan.action, UpdateAction::Skip);
        assert!(plan.content.is_none());
        assert_eq!(plan.diagnostics.count(DiagnosticCode::UnterminatedBlock), 1);
    }
}
