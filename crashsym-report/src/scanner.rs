//! A line-oriented scanner for labeled sections of a crash report.
//!
//! Crash reports are semi-structured text: fields and sections are introduced
//! by a line of the form `<label>: <rest-of-line>`, and multi-line sections
//! (the binary image table, thread backtraces) extend from that line to the
//! next blank line. The scanner operates over an immutable string slice with
//! explicit byte offsets and never mutates shared cursor state.

use std::ops::Range;

use regex::Regex;

/// A labeled section located in a crash report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section<'d> {
    /// The label text preceding the colon, as it appears in the report.
    pub label: &'d str,
    /// The section content.
    ///
    /// For single-line sections this is the remainder of the labeled line.
    /// For block sections it additionally spans all following lines up to,
    /// but not including, the next blank line.
    pub content: &'d str,
    /// The byte range of `content` within the original report text.
    pub range: Range<usize>,
}

/// A scanner over the raw text of a crash report.
#[derive(Clone, Copy, Debug)]
pub struct Scanner<'d> {
    text: &'d str,
}

impl<'d> Scanner<'d> {
    /// Creates a scanner over the given report text.
    pub fn new(text: &'d str) -> Self {
        Scanner { text }
    }

    /// Returns the full report text this scanner operates on.
    pub fn text(&self) -> &'d str {
        self.text
    }

    /// Looks up a single-line section by its exact label.
    ///
    /// Returns the remainder of the first line reading `<label>: <content>`,
    /// with surrounding whitespace trimmed. Absence of the label is a normal
    /// outcome and yields `None`.
    pub fn section(&self, label: &str) -> Option<&'d str> {
        self.find_label(|l| l == label)
            .map(|(_, rest, _)| rest.trim())
    }

    /// Looks up a multi-line section by its exact label.
    ///
    /// The content starts at the remainder of the labeled line and extends to
    /// the first blank line or the end of input, exclusive of the separator.
    pub fn section_block(&self, label: &str) -> Option<&'d str> {
        let (_, _, rest_start) = self.find_label(|l| l == label)?;
        Some(self.block_at(rest_start))
    }

    /// Enumerates all sections whose label matches the given pattern.
    ///
    /// The pattern must match the entire label. Sections are returned in the
    /// order they appear in the report, each with block content as in
    /// [`section_block`](Self::section_block). The scanner itself carries no
    /// cursor, so repeated enumeration always starts from the top.
    pub fn sections_matching(&self, pattern: &Regex) -> Vec<Section<'d>> {
        let mut sections = Vec::new();
        let mut offset = 0;

        while offset < self.text.len() {
            let line = self.line_at(offset);
            if let Some((label, rest)) = split_label(line) {
                let full_match = pattern
                    .find(label)
                    .is_some_and(|m| m.start() == 0 && m.end() == label.len());
                if full_match {
                    let rest_start = offset + (line.len() - rest.len());
                    let content = self.block_at(rest_start);
                    let start = content.as_ptr() as usize - self.text.as_ptr() as usize;
                    sections.push(Section {
                        label,
                        content,
                        range: start..start + content.len(),
                    });
                }
            }
            offset += line.len() + 1;
        }

        sections
    }

    /// Finds the first labeled line accepted by `pred`.
    ///
    /// Returns the label, the remainder of the line, and the byte offset of
    /// that remainder within the report text.
    fn find_label(&self, pred: impl Fn(&str) -> bool) -> Option<(&'d str, &'d str, usize)> {
        let mut offset = 0;
        while offset < self.text.len() {
            let line = self.line_at(offset);
            if let Some((label, rest)) = split_label(line) {
                if pred(label) {
                    let rest_start = offset + (line.len() - rest.len());
                    return Some((label, rest, rest_start));
                }
            }
            offset += line.len() + 1;
        }
        None
    }

    /// Returns the line starting at `offset`, excluding the line terminator.
    fn line_at(&self, offset: usize) -> &'d str {
        let remainder = &self.text[offset..];
        match remainder.find('\n') {
            Some(end) => &remainder[..end],
            None => remainder,
        }
    }

    /// Returns block content starting at `start`, ending before the first
    /// blank line.
    fn block_at(&self, start: usize) -> &'d str {
        let mut offset = start;
        // advance past the remainder of the labeled line
        offset += self.line_at(offset).len() + 1;

        let mut end = offset.min(self.text.len());
        while end < self.text.len() {
            let line = self.line_at(end);
            if line.trim().is_empty() {
                break;
            }
            end += line.len() + 1;
        }

        let content = self.text[start..end.min(self.text.len())]
            .trim_start_matches([' ', '\t'])
            .trim_end_matches('\n');
        // a label without same-line content starts its block on the next line
        content.strip_prefix('\n').unwrap_or(content)
    }
}

/// Splits a line of the form `<label>: <rest>` at the first colon.
fn split_label(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let label = line[..colon].trim_end();
    if label.is_empty() {
        return None;
    }
    Some((label, &line[colon + 1..]))
}
