//! Turns classified results into chat-sized blocks.

use crate::{ClassifiedResult, Severity};

/// Most lines placed in one block.
pub const LINES_PER_BLOCK: usize = 80;

/// Default block ceiling in characters (Discord's message limit).
pub const DEFAULT_MAX_BLOCK_LEN: usize = 2000;

const FENCE: &str = "```";

/// Wrap `text` in a fenced block, prefixed with the severity's marker.
///
/// ```
/// use bgpbot_commands::{Severity, decorate};
///
/// assert_eq!(decorate(Severity::Success, "ok"), "```🟢 ok```");
/// assert_eq!(decorate(Severity::Plain, "help"), "```help```");
/// ```
pub fn decorate(severity: Severity, text: &str) -> String {
    match severity.marker() {
        Some(marker) => format!("{FENCE}{marker} {text}{FENCE}"),
        None => format!("{FENCE}{text}{FENCE}"),
    }
}

/// Splits a [`ClassifiedResult`] into ordered, decorated blocks.
///
/// Lines are grouped up to `lines_per_block` per block, and a block is
/// closed early when the next line would push it past `max_block_len`
/// characters. Only the first block carries the severity marker; the rest
/// are plain fences. A single line longer than the ceiling is never cut: it
/// goes out alone in its own block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultFormatter {
    max_block_len: usize,
    lines_per_block: usize,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BLOCK_LEN)
    }
}

impl ResultFormatter {
    /// Formatter for a transport limited to `max_block_len` characters.
    pub fn new(max_block_len: usize) -> Self {
        Self {
            max_block_len,
            lines_per_block: LINES_PER_BLOCK,
        }
    }

    /// Same formatter with a different per-block line cap (at least 1).
    pub fn capped_at(self, lines_per_block: usize) -> Self {
        Self {
            lines_per_block: lines_per_block.max(1),
            ..self
        }
    }

    /// Character ceiling per block.
    pub fn max_block_len(&self) -> usize {
        self.max_block_len
    }

    /// Line cap per block.
    pub fn lines_per_block(&self) -> usize {
        self.lines_per_block
    }

    /// Render `result` as one or more blocks, in send order.
    pub fn format(&self, result: &ClassifiedResult) -> Vec<String> {
        let severity = *result.severity();
        let single = decorate(severity, result.text());
        let line_count = result.text().split('\n').count();
        if line_count <= self.lines_per_block && char_len(&single) <= self.max_block_len {
            return vec![single];
        }

        self.group(severity, result.text())
            .into_iter()
            .enumerate()
            .map(|(index, chunk)| {
                if index == 0 {
                    decorate(severity, &chunk)
                } else {
                    decorate(Severity::Plain, &chunk)
                }
            })
            .collect()
    }

    fn group(&self, severity: Severity, text: &str) -> Vec<String> {
        let first_overhead = char_len(&decorate(severity, ""));
        let rest_overhead = char_len(&decorate(Severity::Plain, ""));

        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;
        let mut current_lines = 0;

        for line in text.split('\n') {
            let overhead = if chunks.is_empty() {
                first_overhead
            } else {
                rest_overhead
            };
            let line_len = char_len(line);
            let joined_len = if current_lines == 0 {
                line_len
            } else {
                current_len + 1 + line_len
            };

            let full = current_lines >= self.lines_per_block;
            let overflow = current_lines > 0 && joined_len + overhead > self.max_block_len;
            if full || overflow {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
                current_lines = 0;
            }

            if current_lines > 0 {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(line);
            current_len += line_len;
            current_lines += 1;
        }
        chunks.push(current);
        chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
