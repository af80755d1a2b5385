//! mdpage - render markdown for the terminal, or page through it.
//!
//! # Usage
//!
//! ```bash
//! mdpage README.md
//! mdpage -p README.md
//! cat README.md | mdpage --pager auto
//! ```

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing_subscriber::EnvFilter;

use mdpage::app::view_markdown;
use mdpage::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use mdpage::highlight::Background;
use mdpage::perf;
use mdpage::render::{RenderOptions, Renderer, StyleMode, TerminalRenderer};
use mdpage::source::{PagerMode, print_width, read_source};

/// Render markdown in the terminal, or page through it interactively
#[derive(Parser, Debug)]
#[command(name = "mdpage", version, about, long_about = None)]
struct Cli {
    /// Markdown file to view; `-` or piped input reads stdin
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Color scheme for rendering and chrome
    #[arg(short, long, value_enum)]
    style: Option<StyleMode>,

    /// Render width in columns (0 = follow the terminal)
    #[arg(short, long, value_name = "N")]
    width: Option<u16>,

    /// When to open the interactive pager (default: never)
    #[arg(long, value_enum)]
    pager: Option<PagerMode>,

    /// Open the interactive pager (same as --pager always)
    #[arg(short = 'p')]
    page: bool,

    /// Print timing of renders and frames to stderr
    #[arg(long)]
    perf: bool,

    /// Write timestamped debug events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save the given flags as defaults
    #[arg(long)]
    save: bool,

    /// Remove saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    /// Flags given on this command line. An explicit `--pager` wins over `-p`.
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            style: self.style,
            width: self.width,
            pager: self.pager.or(self.page.then_some(PagerMode::Always)),
            perf: self.perf,
            debug_log: self.debug_log.clone(),
        }
    }
}

// Query the terminal background using OSC 11.
// We talk to /dev/tty so the terminal responds even when stdout is piped.
// Elsewhere the query is skipped: a reader thread left blocked on the
// console would swallow the pager's key events.
#[cfg(not(unix))]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    Ok(None)
}

#[cfg(unix)]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    use std::io::Read;
    use std::sync::mpsc;

    let (tx, rx) = mpsc::channel();

    let mut tty = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/tty")?;
    let reader = tty.try_clone()?;

    // ESC ] 11 ; ? BEL
    tty.write_all(b"\x1b]11;?\x07")?;
    tty.flush()?;

    std::thread::spawn(move || {
        let mut reader = reader;
        let mut buf = [0u8; 256];
        let mut collected: Vec<u8> = Vec::new();
        loop {
            match reader.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    collected.extend_from_slice(&buf[..n]);
                    if collected.contains(&b'\x07') || collected.windows(2).any(|w| w == b"\x1b\\") {
                        let _ = tx.send(collected);
                        break;
                    }
                }
            }
        }
    });

    let reply = rx
        .recv_timeout(Duration::from_millis(75))
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();
    Ok(parse_osc11_reply(&reply))
}

fn background_from_rgb(r: u8, g: u8, b: u8) -> Background {
    let luma = 0.0722f32.mul_add(
        f32::from(b),
        0.2126f32.mul_add(f32::from(r), 0.7152 * f32::from(g)),
    );
    if luma >= 140.0 {
        Background::Light
    } else {
        Background::Dark
    }
}

fn detect_background() -> Option<Background> {
    let _raw = enable_raw_mode();
    let result = query_terminal_background();
    let _ = disable_raw_mode();
    match result {
        Ok(found) => found.map(|(r, g, b)| background_from_rgb(r, g, b)),
        Err(err) => {
            tracing::debug!(%err, "terminal background query failed");
            None
        }
    }
}

/// Parse `ESC ] 11 ; rgb:RRRR/GGGG/BBBB` terminated by BEL or ST.
fn parse_osc11_reply(reply: &str) -> Option<(u8, u8, u8)> {
    let start = reply.find("rgb:")?;
    let data = &reply[start + 4..];
    let mut parts = data.split(['/', '\x07', '\x1b']);
    let r = parts.next()?;
    let g = parts.next()?;
    let b = parts.next()?;
    Some((
        parse_osc_component(r)?,
        parse_osc_component(g)?,
        parse_osc_component(b)?,
    ))
}

fn parse_osc_component(s: &str) -> Option<u8> {
    let hex = s.trim();
    if hex.len() >= 4 {
        let v = u16::from_str_radix(hex.get(..4)?, 16).ok()?;
        u8::try_from(v >> 8).ok()
    } else if hex.len() == 2 {
        u8::from_str_radix(hex, 16).ok()
    } else {
        None
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    tracing::debug!(?effective, "resolved flags");

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os(perf::DEBUG_LOG_ENV).map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        tracing::warn!(
            %err,
            path = %debug_log_path.as_ref().map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            "failed to open debug log"
        );
    }

    let stdin = std::io::stdin();
    let source = read_source(cli.file.as_deref(), stdin.lock(), stdin.is_terminal())?;

    let stdout_is_tty = std::io::stdout().is_terminal();
    let paging = effective.pager.unwrap_or_default().should_page(stdout_is_tty);

    let mut style = effective.style.unwrap_or_default();
    if style == StyleMode::Auto && (paging || stdout_is_tty) {
        if let Some(background) = detect_background() {
            style = match background {
                Background::Dark => StyleMode::Dark,
                Background::Light => StyleMode::Light,
            };
        }
    }
    let options = RenderOptions {
        style,
        width: effective.width.unwrap_or(0),
    };

    if paging {
        return view_markdown(&source.title, &source.text, options, std::io::stdout())
            .context("Pager error");
    }

    let width = if options.width > 0 {
        options.width
    } else {
        let terminal_width = stdout_is_tty
            .then(crossterm::terminal::size)
            .and_then(Result::ok)
            .map(|(w, _)| w);
        print_width(terminal_width)
    };
    let rendered = {
        let _scope = perf::scope("print.render");
        TerminalRenderer
            .render(&source.text, &options.with_width(width))
            .context("Failed to render markdown")?
    };
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write stdout")
}
