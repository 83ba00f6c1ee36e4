//! Managed Region Detection
//!
//! The instructions document is free-form user text with at most one managed
//! region. The region is recognized by the signature phrase, starts at the
//! nearest top-level heading above it, and runs until the next top-level
//! heading or end of file. Lines inside fenced code blocks never count as
//! headings.

use memory_bank_core::SIGNATURE_PHRASE;

/// Byte range of the managed region within the instructions text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagedRegion {
    pub start: usize,
    pub end: usize,
}

impl ManagedRegion {
    /// Slice the region out of the text it was found in.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Whether the text carries the signature phrase (case-insensitive).
pub fn has_signature(text: &str) -> bool {
    signature_offset(text).is_some()
}

fn signature_offset(text: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets aligned with the original text.
    text.to_ascii_lowercase()
        .find(&SIGNATURE_PHRASE.to_ascii_lowercase())
}

#[derive(Debug)]
struct Line {
    start: usize,
    heading_level: Option<usize>,
}

fn scan_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut offset = 0;
    let mut in_fence = false;

    for raw in text.split_inclusive('\n') {
        let trimmed = raw.trim_start();
        let heading_level = if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            None
        } else if in_fence {
            None
        } else {
            heading_level(raw)
        };

        lines.push(Line {
            start: offset,
            heading_level,
        });
        offset += raw.len();
    }

    lines
}

/// ATX heading level of a line (`# ` → 1, `## ` → 2, ...).
fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match line[hashes..].chars().next() {
        Some(' ') | Some('\t') | Some('\n') | Some('\r') | None => Some(hashes),
        _ => None,
    }
}

/// Locate the managed region, or `None` when the document has no signature.
pub fn find_managed_region(text: &str) -> Option<ManagedRegion> {
    let signature = signature_offset(text)?;
    let lines = scan_lines(text);

    let sig_line = lines
        .iter()
        .rposition(|line| line.start <= signature)
        .unwrap_or(0);

    let start_line = (0..=sig_line)
        .rev()
        .find(|&i| lines[i].heading_level == Some(1))
        .or_else(|| {
            (0..=sig_line)
                .rev()
                .find(|&i| lines[i].heading_level.is_some())
        })
        .unwrap_or(sig_line);

    let end = lines
        .iter()
        .skip(start_line + 1)
        .find(|line| line.heading_level == Some(1))
        .map(|line| line.start)
        .unwrap_or(text.len());

    Some(ManagedRegion {
        start: lines[start_line].start,
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANAGED: &str = concat!(
        "# Copilot's Memory Bank\n\n",
        "After every memory reset, I begin completely fresh.\n\n",
        "## Core Files\n- `projectbrief.md`\n"
    );

    #[test]
    fn test_no_signature_means_no_region() {
        let text = "# My Rules\n\nUse tabs.\n\n# Memory Bank\n- `progress.md`\n";
        assert!(!has_signature(text));
        assert!(find_managed_region(text).is_none());
    }

    #[test]
    fn test_signature_is_case_insensitive() {
        assert!(has_signature("after every memory reset, i begin completely fresh"));
    }

    #[test]
    fn test_region_starts_at_heading_and_runs_to_eof() {
        let user = "# Team Rules\n\nAlways write tests.\n\n";
        let text = format!("{}{}", user, MANAGED);

        let region = find_managed_region(&text).unwrap();
        assert_eq!(region.start, user.len());
        assert_eq!(region.end, text.len());
        assert_eq!(region.slice(&text), MANAGED);
    }

    #[test]
    fn test_region_ends_at_next_top_level_heading() {
        let tail = "# Appendix\n\nSee `notes.md`.\n";
        let text = format!("{}\n{}", MANAGED, tail);

        let region = find_managed_region(&text).unwrap();
        assert_eq!(region.start, 0);
        assert_eq!(&text[region.end..], tail);
        assert!(region.slice(&text).contains("## Core Files"));
    }

    #[test]
    fn test_fenced_hash_lines_are_not_headings() {
        let text = format!("{}\n```sh\n# not a heading\n```\n- `progress.md`\n", MANAGED);
        let region = find_managed_region(&text).unwrap();
        assert_eq!(region.end, text.len());
    }

    #[test]
    fn test_signature_without_heading() {
        let text = "Some intro.\nAfter every memory reset, I begin completely fresh.\n- `a.md`\n";
        let region = find_managed_region(text).unwrap();
        assert_eq!(region.start, "Some intro.\n".len());
        assert_eq!(region.end, text.len());
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("# Title\n"), Some(1));
        assert_eq!(heading_level("### Sub"), Some(3));
        assert_eq!(heading_level("#hashtag"), None);
        assert_eq!(heading_level("plain"), None);
    }
}
