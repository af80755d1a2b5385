//! Rendered output split into lines, with ANSI-stripped twins for matching.

/// Renderer output at one width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Lines as produced by the renderer, escape sequences included
    pub lines: Vec<String>,
    /// The same lines with escape sequences removed
    pub plain: Vec<String>,
    /// Width the document was rendered at
    pub width: u16,
}

impl RenderedDocument {
    pub fn from_output(output: &str, width: u16) -> Self {
        let lines = split_lines(output);
        let plain = lines.iter().map(|line| strip_ansi(line)).collect();
        Self {
            lines,
            plain,
            width,
        }
    }

    /// Placeholder content shown in place of a document that failed to render.
    pub fn from_error(message: &str, width: u16) -> Self {
        let lines = vec!["(render error)".to_string(), message.to_string()];
        Self {
            plain: lines.clone(),
            lines,
            width,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split renderer output into lines.
///
/// A single trailing newline does not produce an empty last line, and empty
/// output yields no lines at all.
pub fn split_lines(output: &str) -> Vec<String> {
    let output = output.replace("\r\n", "\n");
    let trimmed = output.strip_suffix('\n').unwrap_or(&output);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('\n').map(str::to_string).collect()
}

/// Remove CSI escape sequences (`ESC [ ... final`) from a line.
///
/// A bare `ESC` not followed by `[` is dropped on its own.
pub fn strip_ansi(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            out.push(ch);
            continue;
        }
        if chars.peek() != Some(&'[') {
            continue;
        }
        chars.next();
        for c in chars.by_ref() {
            if ('\x40'..='\x7e').contains(&c) {
                break;
            }
        }
    }

    out
}
