//! Saved defaults: command-line flag tokens stored in a global config file
//! and an optional local `.mdpagerc`.
//!
//! Files hold the same tokens the command line accepts, one or more per
//! line, with `#` comments. Later sources override earlier ones: global
//! file, then local file, then the command line itself.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::render::StyleMode;
use crate::source::PagerMode;

const LOCAL_FILE: &str = ".mdpagerc";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub style: Option<StyleMode>,
    /// Fixed render width; 0 follows the terminal
    pub width: Option<u16>,
    pub pager: Option<PagerMode>,
    pub perf: bool,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets, letting `other` win where both set a value.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            style: other.style.or(self.style),
            width: other.width.or(self.width),
            pager: other.pager.or(self.pager),
            perf: self.perf || other.perf,
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }

    /// Flag tokens reproducing this set, one flag per entry.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(style) = self.style {
            lines.push(format!("--style {}", style.as_str()));
        }
        if let Some(width) = self.width {
            lines.push(format!("--width {width}"));
        }
        if let Some(pager) = self.pager {
            lines.push(format!("--pager {}", pager.as_str()));
        }
        if self.perf {
            lines.push("--perf".to_string());
        }
        if let Some(path) = &self.debug_log {
            lines.push(format!("--debug-log {}", path.display()));
        }
        lines
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("mdpage").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("mdpage")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("mdpage").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("mdpage").join("config");
        }
    }

    PathBuf::from(LOCAL_FILE)
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_FILE)
}

/// Read flags from `path`; a missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# mdpage defaults (saved with --save)".to_string()];
    lines.extend(flags.to_lines());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove the file at `path` if there is one.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this module knows out of command-line style tokens.
///
/// Unknown tokens, positional arguments and invalid values are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(
            name,
            "-s" | "--style" | "-w" | "--width" | "--pager" | "--debug-log"
        );
        let value = if takes_value && inline.is_none() {
            i += 1;
            tokens.get(i).map(String::as_str)
        } else {
            inline
        };

        match (name, value) {
            ("-s" | "--style", Some(value)) => flags.style = parse_enum(value),
            ("-w" | "--width", Some(value)) => flags.width = value.parse().ok(),
            ("--pager", Some(value)) => flags.pager = parse_enum(value),
            ("--debug-log", Some(value)) => flags.debug_log = Some(PathBuf::from(value)),
            ("-p", None) => flags.pager = Some(PagerMode::Always),
            ("--perf", None) => flags.perf = true,
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_enum<T: ValueEnum>(value: &str) -> Option<T> {
    T::from_str(value, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&tokens(&[
            "mdpage",
            "--style",
            "light",
            "-w",
            "72",
            "--pager=auto",
            "--perf",
            "--debug-log=events.log",
            "README.md",
        ]));
        assert_eq!(flags.style, Some(StyleMode::Light));
        assert_eq!(flags.width, Some(72));
        assert_eq!(flags.pager, Some(PagerMode::Auto));
        assert!(flags.perf);
        assert_eq!(flags.debug_log, Some(PathBuf::from("events.log")));
    }

    #[test]
    fn test_short_pager_flag_means_always() {
        let flags = parse_flag_tokens(&tokens(&["-p", "-s", "dark", "-"]));
        assert_eq!(flags.pager, Some(PagerMode::Always));
        assert_eq!(flags.style, Some(StyleMode::Dark));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--style", "neon", "--width", "wide", "--pager"]));
        assert_eq!(flags, ConfigFlags::default());
    }

    #[test]
    fn test_union_prefers_later_values() {
        let file = ConfigFlags {
            style: Some(StyleMode::Light),
            width: Some(60),
            perf: true,
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            style: Some(StyleMode::Dark),
            pager: Some(PagerMode::Always),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.style, Some(StyleMode::Dark));
        assert_eq!(merged.width, Some(60));
        assert_eq!(merged.pager, Some(PagerMode::Always));
        assert!(merged.perf);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            style: Some(StyleMode::Dark),
            width: Some(100),
            pager: Some(PagerMode::Never),
            perf: true,
            debug_log: Some(PathBuf::from("mdpage.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# mdpage defaults"));
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
        // Clearing twice is fine
        clear_config_flags(&path).unwrap();
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOCAL_FILE);
        fs::write(&path, "# defaults\n\n--width 90\n  --pager always --perf\n").unwrap();
        let flags = load_config_flags(&path).unwrap();
        assert_eq!(flags.width, Some(90));
        assert_eq!(flags.pager, Some(PagerMode::Always));
        assert!(flags.perf);
    }
}
