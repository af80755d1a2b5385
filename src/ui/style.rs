//! Theming for the pager chrome.
//!
//! Rendered markdown carries its own colors; this module only styles what
//! the pager draws around it: header, footer, gutter markers, scrollbar and
//! the help and TOC overlays.

use ratatui::style::{Color, Modifier, Style};

use crate::highlight::Background;

/// Chrome styles for one terminal background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Title and breadcrumb
    pub header_left: Style,
    /// Percent and fold level
    pub header_right: Style,
    pub footer: Style,
    /// Rendered lines that hold a heading
    pub heading_line: Style,
    /// Help box and TOC box body
    pub modal: Style,
    pub modal_border: Style,
    pub toc_title: Style,
    pub toc_filter: Style,
    pub toc_footer: Style,
    pub toc_selected: Style,
    pub toc_normal: Style,
    pub marker_heading: Style,
    pub marker_match_current: Style,
    pub marker_match_other: Style,
    pub marker_none: Style,
    pub scrollbar_track: Style,
    pub scrollbar_thumb: Style,
}

/// Raw palette a [`Theme`] is built from.
struct Colors {
    header_bg: Color,
    header_fg: Color,
    header_fg_muted: Color,
    footer_bg: Color,
    footer_fg: Color,
    modal_bg: Color,
    modal_fg: Color,
    border: Color,
    heading_line_bg: Color,
    heading_line_fg: Color,
    accent: Color,
    selection_bg: Color,
    selection_fg: Color,
    scrollbar_track: Color,
    scrollbar_thumb: Color,
    marker_dim: Color,
}

// Each channel is truncated to its low 8 bits
#[allow(clippy::cast_possible_truncation)]
const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn for_background(background: Background) -> Self {
        match background {
            Background::Dark => Self::dark(),
            Background::Light => Self::light(),
        }
    }

    /// Create a theme optimized for dark terminals.
    pub fn dark() -> Self {
        Self::build(
            &Colors {
                header_bg: hex(0x2B_2B2B),
                header_fg: hex(0xF2_F2F2),
                header_fg_muted: hex(0xD0_D0D0),
                footer_bg: hex(0x1E_1E1E),
                footer_fg: hex(0xB8_B8B8),
                modal_bg: hex(0x14_1414),
                modal_fg: hex(0xE6_E6E6),
                border: hex(0x5C_5C5C),
                heading_line_bg: hex(0x20_2020),
                heading_line_fg: hex(0xF2_F2F2),
                accent: hex(0x8A_B4F8),
                selection_bg: hex(0x30_3030),
                selection_fg: hex(0xF2_F2F2),
                scrollbar_track: hex(0x3D_3D3D),
                scrollbar_thumb: hex(0xB8_B8B8),
                marker_dim: hex(0x7A_7A7A),
            },
            Background::Dark,
        )
    }

    /// Create a theme optimized for light terminals.
    pub fn light() -> Self {
        Self::build(
            &Colors {
                header_bg: hex(0xEF_EFEF),
                header_fg: hex(0x1A_1A1A),
                header_fg_muted: hex(0x44_4444),
                footer_bg: hex(0xF5_F5F5),
                footer_fg: hex(0x44_4444),
                modal_bg: hex(0xF8_F8F8),
                modal_fg: hex(0x1A_1A1A),
                border: hex(0xB0_B0B0),
                heading_line_bg: hex(0xEA_EAEA),
                heading_line_fg: hex(0x1A_1A1A),
                accent: hex(0x25_63EB),
                selection_bg: hex(0x25_63EB),
                selection_fg: hex(0xF8_F8F8),
                scrollbar_track: hex(0xC9_C9C9),
                scrollbar_thumb: hex(0x66_6666),
                marker_dim: hex(0x88_8888),
            },
            Background::Light,
        )
    }

    fn build(c: &Colors, background: Background) -> Self {
        let bold = Modifier::BOLD;
        let toc_normal_fg = match background {
            // Light modals need the darker header ink to separate from the page
            Background::Light => c.header_fg,
            Background::Dark => c.modal_fg,
        };
        Self {
            header_left: Style::default()
                .fg(c.header_fg)
                .bg(c.header_bg)
                .add_modifier(bold),
            header_right: Style::default().fg(c.header_fg_muted).bg(c.header_bg),
            footer: Style::default().fg(c.footer_fg).bg(c.footer_bg),
            heading_line: Style::default()
                .fg(c.heading_line_fg)
                .bg(c.heading_line_bg)
                .add_modifier(bold),
            modal: Style::default().fg(c.modal_fg).bg(c.modal_bg),
            modal_border: Style::default().fg(c.border).bg(c.modal_bg),
            toc_title: Style::default()
                .fg(c.header_fg)
                .bg(c.header_bg)
                .add_modifier(bold),
            toc_filter: Style::default().fg(c.header_fg_muted).bg(c.header_bg),
            toc_footer: Style::default().fg(c.footer_fg).bg(c.footer_bg),
            toc_selected: Style::default()
                .fg(c.selection_fg)
                .bg(c.selection_bg)
                .add_modifier(bold),
            toc_normal: Style::default().fg(toc_normal_fg).bg(c.modal_bg),
            marker_heading: Style::default().fg(c.accent),
            marker_match_current: Style::default().fg(c.accent).add_modifier(bold),
            marker_match_other: Style::default().fg(c.accent),
            marker_none: Style::default().fg(c.marker_dim),
            scrollbar_track: Style::default().fg(c.scrollbar_track),
            scrollbar_thumb: Style::default().fg(c.scrollbar_thumb),
        }
    }
}
