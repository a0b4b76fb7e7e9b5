//! User block extraction.

use crate::markers::{is_end, parse_start};

/// One delimited user block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBlock {
    /// The label, or `block_N` for the N-th block (0-based) when unlabeled.
    pub id: String,
    pub label: Option<String>,
    /// Lines strictly between the markers.
    pub content: Vec<String>,
    /// Line index of the start marker.
    pub start: usize,
    /// Line index of the end marker.
    pub end: usize,
}

impl UserBlock {
    pub fn is_empty(&self) -> bool {
        self.content.iter().all(|l| l.trim().is_empty())
    }
}

/// Result of scanning a text for user blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockScan {
    pub blocks: Vec<UserBlock>,
    /// Line index of a start marker with no matching end marker.
    pub unterminated: Option<usize>,
}

impl BlockScan {
    pub fn get(&self, id: &str) -> Option<&UserBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn has_blocks(&self) -> bool {
        !self.blocks.is_empty()
    }
}

enum State {
    Outside,
    Inside { label: Option<String>, start: usize, content: Vec<String> },
}

/// Scan `text` line by line for user blocks.
///
/// Inside a block only the end marker is significant; a nested start marker
/// is ordinary content. A block left open at the end of the text is not
/// returned and its start line is reported in [`BlockScan::unterminated`].
pub fn extract_blocks(text: &str) -> BlockScan {
    let mut scan = BlockScan::default();
    let mut state = State::Outside;

    for (index, line) in text.split('\n').enumerate() {
        state = match state {
            State::Outside => match parse_start(line) {
                Some(label) => State::Inside { label, start: index, content: Vec::new() },
                None => State::Outside,
            },
            State::Inside { label, start, mut content } => {
                if is_end(line) {
                    let id = label.clone().unwrap_or_else(|| format!("block_{}", scan.blocks.len()));
                    scan.blocks.push(UserBlock { id, label, content, start, end: index });
                    State::Outside
                } else {
                    content.push(line.to_string());
                    State::Inside { label, start, content }
                }
            }
        };
    }

    if let State::Inside { start, .. } = state {
        scan.unterminated = Some(start);
    }
    scan
}
