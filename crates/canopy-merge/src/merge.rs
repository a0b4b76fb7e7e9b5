//! Non-destructive regeneration.
//!
//! Merging carries the user blocks of a previous file into freshly generated
//! text. Blocks are matched by id, then by position; previous blocks that
//! find no home are appended at the end so hand-written code is never lost.
//! A previous file with a start marker that is never closed is passed
//! through unchanged.

use crate::blocks::{extract_blocks, BlockScan, UserBlock};
use crate::markers::{end_line, start_line};
use canopy_core::diagnostics::{DiagnosticCode, Diagnostics};

/// Merged text plus what happened to the previous blocks.
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    pub text: String,
    /// Fresh blocks that received previous content.
    pub preserved: usize,
    /// Previous blocks appended because no fresh block matched them.
    pub appended: usize,
    pub diagnostics: Diagnostics,
}

/// Merge `previous` into `fresh`, keeping user block content.
pub fn merge(previous: &str, fresh: &str) -> String {
    merge_with_report(previous, fresh).text
}

pub fn merge_with_report(previous: &str, fresh: &str) -> MergeReport {
    let mut diagnostics = Diagnostics::new();
    let prev = extract_blocks(previous);
    if report_unterminated(&prev, "previous", &mut diagnostics) {
        return MergeReport { text: previous.to_string(), diagnostics, ..MergeReport::default() };
    }
    if !prev.has_blocks() {
        return MergeReport { text: fresh.to_string(), diagnostics, ..MergeReport::default() };
    }

    let next = extract_blocks(fresh);
    report_unterminated(&next, "generated", &mut diagnostics);
    let sources = match_blocks(&prev, &next);

    let lines: Vec<&str> = fresh.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut preserved = 0;
    let mut cursor = 0;
    for (block, source) in next.blocks.iter().zip(&sources) {
        out.extend(lines[cursor..=block.start].iter().map(|l| l.to_string()));
        let content = match source {
            Some(i) => {
                preserved += 1;
                &prev.blocks[*i].content
            }
            None => &block.content,
        };
        out.extend(content.iter().cloned());
        out.push(lines[block.end].to_string());
        cursor = block.end + 1;
    }
    out.extend(lines[cursor..].iter().map(|l| l.to_string()));
    let mut text = out.join("\n");

    let orphans: Vec<&UserBlock> = prev
        .blocks
        .iter()
        .enumerate()
        .filter(|(i, block)| !sources.contains(&Some(*i)) && !block.is_empty())
        .map(|(_, block)| block)
        .collect();
    for block in &orphans {
        append_block(&mut text, block);
    }

    log::debug!("Merged user blocks: {} preserved, {} appended", preserved, orphans.len());
    MergeReport { text, preserved, appended: orphans.len(), diagnostics }
}

/// For each fresh block, the index of the previous block supplying its
/// content. Ids are matched first; unmatched blocks then take the previous
/// block at the same position if nothing claimed it.
fn match_blocks(prev: &BlockScan, next: &BlockScan) -> Vec<Option<usize>> {
    let mut sources: Vec<Option<usize>> = next
        .blocks
        .iter()
        .map(|b| prev.blocks.iter().position(|p| p.id == b.id))
        .collect();
    for i in 0..sources.len() {
        if sources[i].is_none() && i < prev.blocks.len() && !sources.contains(&Some(i)) {
            sources[i] = Some(i);
        }
    }
    sources
}

/// Re-wrap a block at the end of `text`, labeled with its id so that it keeps
/// its identity on the next merge.
fn append_block(text: &mut String, block: &UserBlock) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&start_line(Some(&block.id), ""));
    text.push('\n');
    for line in &block.content {
        text.push_str(line);
        text.push('\n');
    }
    text.push_str(&end_line(""));
    text.push('\n');
}

/// Warn about a dangling start marker. Returns whether one was found.
pub(crate) fn report_unterminated(scan: &BlockScan, which: &str, diagnostics: &mut Diagnostics) -> bool {
    let Some(line) = scan.unterminated else {
        return false;
    };
    log::warn!("Unterminated user block in {} text at line {}", which, line + 1);
    diagnostics.warn(
        DiagnosticCode::UnterminatedBlock,
        None,
        format!("user block opened on line {} of the {} text is never closed", line + 1, which),
    );
    true
}
