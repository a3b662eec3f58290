//! Plain text table output.

use std::io::{self, Write};

use console::Style;

use crate::search::Torrent;

use super::Presenter;

const HEADERS: [&str; 7] = [
    "Index",
    "Name",
    "Size",
    "Seeders",
    "Leechers",
    "Date of upload",
    "Source",
];

/// Columns that hold numbers and are right aligned.
const NUMERIC: [bool; 7] = [true, false, false, true, true, false, false];

const SEEDERS: usize = 3;
const LEECHERS: usize = 4;

const DEFAULT_MAX_NAME_WIDTH: usize = 60;

/// Bordered table with a line between rows.
#[derive(Debug, Clone)]
pub struct TablePresenter {
    max_name_width: usize,
    colors: bool,
}

impl Default for TablePresenter {
    fn default() -> Self {
        Self {
            max_name_width: DEFAULT_MAX_NAME_WIDTH,
            colors: false,
        }
    }
}

impl TablePresenter {
    /// Plain table without escape codes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Colored when stdout is a terminal that supports it.
    pub fn for_terminal() -> Self {
        Self::new().with_colors(console::colors_enabled())
    }

    /// Seeders in bold green and leechers in bold red.
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Longer names are cut and end with an ellipsis.
    pub fn with_max_name_width(mut self, width: usize) -> Self {
        self.max_name_width = width.max(1);
        self
    }

    fn row(&self, index: usize, torrent: &Torrent) -> [String; 7] {
        [
            index.to_string(),
            truncate(torrent.name(), self.max_name_width),
            torrent.size().to_string(),
            torrent.seeders().to_string(),
            torrent.leechers().to_string(),
            torrent.upload_date().to_string(),
            torrent.source().to_string(),
        ]
    }
}

impl Presenter for TablePresenter {
    fn render(&self, torrents: &[Torrent], out: &mut dyn Write) -> io::Result<()> {
        let rows: Vec<[String; 7]> = torrents
            .iter()
            .enumerate()
            .map(|(i, t)| self.row(i, t))
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut styles: [Option<Style>; 7] = Default::default();
        if self.colors {
            styles[SEEDERS] = Some(Style::new().green().bright().bold().force_styling(true));
            styles[LEECHERS] = Some(Style::new().red().bright().bold().force_styling(true));
        }

        let separator = separator(&widths);
        writeln!(out, "{}", separator)?;
        writeln!(
            out,
            "{}",
            line(&HEADERS.map(String::from), &widths, false, &Default::default())
        )?;
        writeln!(out, "{}", separator)?;
        for row in &rows {
            writeln!(out, "{}", line(row, &widths, true, &styles))?;
            writeln!(out, "{}", separator)?;
        }
        out.flush()
    }
}

fn separator(widths: &[usize; 7]) -> String {
    let mut s = String::from("+");
    for width in widths {
        s.push_str(&"-".repeat(width + 2));
        s.push('+');
    }
    s
}

/// Cells are padded before styling so escape codes never count as width.
fn line(
    cells: &[String; 7],
    widths: &[usize; 7],
    align_numbers: bool,
    styles: &[Option<Style>; 7],
) -> String {
    let mut s = String::from("|");
    for (i, cell) in cells.iter().enumerate() {
        let width = widths[i];
        let padded = if align_numbers && NUMERIC[i] {
            format!("{:>width$}", cell, width = width)
        } else {
            format!("{:<width$}", cell, width = width)
        };
        match &styles[i] {
            Some(style) => s.push_str(&format!(" {} |", style.apply_to(padded))),
            None => s.push_str(&format!(" {} |", padded)),
        }
    }
    s
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn render(presenter: &TablePresenter, torrents: &[Torrent]) -> String {
        let mut out = Vec::new();
        presenter.render(torrents, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_header_and_rows() {
        let torrents = vec![
            fixtures::torrent("Ubuntu Server", 50, "archive"),
            fixtures::torrent("Ubuntu", 5, "archive"),
        ];
        let output = render(&TablePresenter::new(), &torrents);
        let lines: Vec<&str> = output.lines().collect();

        // separator, header, separator, then row + separator per torrent
        assert_eq!(lines.len(), 3 + 2 * 2);
        assert!(lines[1].contains("Index"));
        assert!(lines[1].contains("Date of upload"));
        assert!(lines[3].starts_with("|     0 | Ubuntu Server |"));
        assert!(lines[5].starts_with("|     1 | Ubuntu        |"));
        assert!(lines[3].contains("|      50 |"));
        assert!(lines[3].ends_with("| archive |"));
    }

    #[test]
    fn test_render_lines_have_equal_width() {
        let torrents = vec![
            fixtures::torrent("a", 1, "archive"),
            fixtures::torrent("a much longer name", 12345, "mirror"),
        ];
        let output = render(&TablePresenter::new(), &torrents);
        let widths: Vec<usize> = output.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_render_empty_list_prints_header_only() {
        let output = render(&TablePresenter::new(), &[]);
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_long_names_are_truncated() {
        let torrents = vec![fixtures::torrent("abcdefghijkl", 1, "archive")];
        let output = render(&TablePresenter::new().with_max_name_width(5), &torrents);
        assert!(output.contains("abcd…"));
        assert!(!output.contains("abcde"));
    }

    #[test]
    fn test_colors_only_touch_seeders_and_leechers() {
        let torrents = vec![fixtures::torrent("Ubuntu", 50, "archive")];
        let plain = render(&TablePresenter::new(), &torrents);
        let colored = render(&TablePresenter::new().with_colors(true), &torrents);

        let row = colored.lines().nth(3).unwrap();
        assert!(row.starts_with("|     0 | Ubuntu |"));
        assert!(row.contains("\u{1b}[1m"));
        assert!(row.contains("     50\u{1b}[0m |"));
        assert!(row.contains("      25\u{1b}[0m |"));
        assert!(!row.contains("Ubuntu\u{1b}"));

        // Header and borders stay plain and widths are unchanged
        assert_eq!(console::strip_ansi_codes(&colored), plain);
        assert_eq!(colored.lines().nth(1), plain.lines().nth(1));
    }

    #[test]
    fn test_new_is_plain() {
        let torrents = vec![fixtures::torrent("Ubuntu", 50, "archive")];
        let output = render(&TablePresenter::new(), &torrents);
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("éàüöïçñ", 3), "éà…");
    }
}
