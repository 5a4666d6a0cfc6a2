//! Lossy text condensing used by the aggressive strategy.
//!
//! Conversational context is highly repetitive: re-quoted code blocks,
//! repeated tool output, long runs of blank lines. Condensing drops that
//! redundancy before zstd sees the text.

use std::collections::HashSet;

/// Condense text: trim trailing whitespace, collapse blank-line runs to a
/// single blank line, and drop exact duplicate non-blank lines after their
/// first occurrence. Line order is otherwise preserved.
pub fn condense(text: &str) -> String {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out: Vec<&str> = Vec::new();
    let mut last_blank = false;

    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            if !last_blank && !out.is_empty() {
                out.push("");
            }
            last_blank = true;
            continue;
        }
        last_blank = false;
        if seen.insert(trimmed) {
            out.push(trimmed);
        }
    }
    // Drop a trailing blank left by a collapse at the end.
    while out.last() == Some(&"") {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_blank_runs() {
        assert_eq!(condense("a\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn drops_duplicate_lines_keeping_first() {
        assert_eq!(condense("x\ny\nx\nz"), "x\ny\nz");
    }

    #[test]
    fn trims_trailing_whitespace() {
        assert_eq!(condense("a   \nb\t"), "a\nb");
    }

    #[test]
    fn idempotent() {
        let text = "fn main() {}\n\nfn main() {}\n\n\nlet x = 1;";
        let once = condense(text);
        assert_eq!(condense(&once), once);
    }

    #[test]
    fn unique_text_is_preserved() {
        assert_eq!(condense("one\ntwo\nthree"), "one\ntwo\nthree");
    }
}
