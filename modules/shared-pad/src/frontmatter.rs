//! Frontmatter decoration for pad responses.
//!
//! The block is generated on the way out and never stored. Content read back
//! from older pads (or echoed by a client) may already carry one, so
//! decoration always strips a leading block first.

const DELIMITER: &str = "---";

/// Metadata rendered into the block, in emission order
#[derive(Debug, Clone)]
pub struct PadFrontmatter<'a> {
    pub chat_id: &'a str,
    pub file_path: &'a str,
    /// Length of the content before the write, write responses only
    pub old_content_length: Option<usize>,
}

/// Remove a leading `---` ... `---` block.
///
/// Leading blank lines are skipped. Content whose first non-empty line is not
/// exactly `---`, or whose block is never closed, comes back unchanged.
pub fn strip_frontmatter(content: &str) -> &str {
    let mut lines = LineCursor::new(content);

    let opening = loop {
        match lines.next_line() {
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => break line,
            None => return content,
        }
    };
    if opening.trim() != DELIMITER {
        return content;
    }

    while let Some(line) = lines.next_line() {
        if line.trim() == DELIMITER {
            return lines.rest();
        }
    }
    content
}

/// Prepend a freshly generated block, replacing any existing one.
pub fn decorate(meta: &PadFrontmatter<'_>, content: &str) -> String {
    let body = strip_frontmatter(content);

    let mut lines = Vec::with_capacity(7);
    lines.push(DELIMITER.to_string());
    lines.push(format!("chat_id: {}", meta.chat_id));
    lines.push(format!("file_path: {}", meta.file_path));
    lines.push(format!("content_length: {}", content_length(body)));
    if let Some(old) = meta.old_content_length {
        lines.push(format!("old_content_length: {}", old));
    }
    lines.push(DELIMITER.to_string());
    lines.push(body.to_string());

    lines.join("\n")
}

/// Length in characters, which is what clients see in an editor.
pub fn content_length(content: &str) -> usize {
    content.chars().count()
}

/// Walks `\n`-separated lines while remembering where the unread tail starts.
struct LineCursor<'a> {
    content: &'a str,
    pos: Option<usize>,
}

impl<'a> LineCursor<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content,
            pos: Some(0),
        }
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let start = self.pos?;
        match self.content[start..].find('\n') {
            Some(offset) => {
                self.pos = Some(start + offset + 1);
                Some(&self.content[start..start + offset])
            }
            None => {
                self.pos = None;
                Some(&self.content[start..])
            }
        }
    }

    /// Everything after the last line returned; empty once exhausted.
    fn rest(&self) -> &'a str {
        match self.pos {
            Some(start) => &self.content[start..],
            None => "",
        }
    }
}
