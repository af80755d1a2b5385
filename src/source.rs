//! Where the markdown comes from and where the result goes.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Title used for documents read from standard input.
pub const STDIN_TITLE: &str = "stdin";

/// Width used for printing when the terminal size is unknown.
pub const FALLBACK_WIDTH: u16 = 80;

/// Whether to open the interactive pager or print the rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PagerMode {
    /// Page only when stdout is a terminal
    Auto,
    Always,
    /// Print to stdout
    #[default]
    Never,
}

impl PagerMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        }
    }

    pub const fn should_page(self, stdout_is_tty: bool) -> bool {
        match self {
            Self::Auto => stdout_is_tty,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// A markdown document and the title to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub text: String,
}

/// Read the document named on the command line.
///
/// `-` reads `stdin`. With no path, `stdin` is read only when it is not a
/// terminal, so running without input fails instead of waiting for typing.
/// Invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
///
/// Returns an error when there is no input or it cannot be read.
pub fn read_source<R: Read>(path: Option<&Path>, stdin: R, stdin_is_tty: bool) -> Result<Source> {
    match path {
        Some(path) if path.as_os_str() == "-" => read_stdin(stdin),
        Some(path) => {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read file {}", path.display()))?;
            let title = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
            Ok(Source {
                title,
                text: String::from_utf8_lossy(&bytes).into_owned(),
            })
        }
        None if !stdin_is_tty => read_stdin(stdin),
        None => bail!("no input: provide a file path or pipe markdown via stdin"),
    }
}

fn read_stdin<R: Read>(mut stdin: R) -> Result<Source> {
    let mut bytes = Vec::new();
    stdin
        .read_to_end(&mut bytes)
        .context("Failed to read stdin")?;
    Ok(Source {
        title: STDIN_TITLE.to_string(),
        text: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Width for printed output: the terminal width less a two-column margin
/// (when the terminal is wider than four columns), or the fallback.
pub fn print_width(terminal_width: Option<u16>) -> u16 {
    match terminal_width {
        Some(w) if w > 4 => w - 2,
        Some(w) if w > 0 => w,
        _ => FALLBACK_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_file_source_uses_base_name_as_title() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "# Notes\n").unwrap();

        let source = read_source(Some(&path), Cursor::new(Vec::new()), true).unwrap();
        assert_eq!(source.title, "notes.md");
        assert_eq!(source.text, "# Notes\n");
    }

    #[test]
    fn test_dash_reads_stdin_even_from_a_terminal() {
        let source = read_source(Some(Path::new("-")), Cursor::new(b"piped".to_vec()), true).unwrap();
        assert_eq!(source.title, STDIN_TITLE);
        assert_eq!(source.text, "piped");
    }

    #[test]
    fn test_piped_stdin_without_path() {
        let source = read_source(None, Cursor::new(b"# Hi\n".to_vec()), false).unwrap();
        assert_eq!(source.title, "stdin");
        assert_eq!(source.text, "# Hi\n");
    }

    #[test]
    fn test_no_input_is_an_error() {
        let err = read_source(None, Cursor::new(Vec::new()), true).unwrap_err();
        assert!(err.to_string().starts_with("no input"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.md");
        let err = read_source(Some(&path), Cursor::new(Vec::new()), true).unwrap_err();
        assert!(err.to_string().contains("absent.md"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let source = read_source(None, Cursor::new(vec![b'a', 0xff, b'b']), false).unwrap();
        assert_eq!(source.text, "a\u{fffd}b");
    }

    #[test]
    fn test_pager_modes() {
        assert!(PagerMode::Always.should_page(false));
        assert!(!PagerMode::Never.should_page(true));
        assert!(PagerMode::Auto.should_page(true));
        assert!(!PagerMode::Auto.should_page(false));
        assert_eq!(PagerMode::default(), PagerMode::Never);
    }

    #[test]
    fn test_print_width_keeps_margin() {
        assert_eq!(print_width(Some(100)), 98);
        assert_eq!(print_width(Some(4)), 4);
        assert_eq!(print_width(Some(0)), FALLBACK_WIDTH);
        assert_eq!(print_width(None), FALLBACK_WIDTH);
    }
}
