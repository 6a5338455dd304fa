//! Mapping styled runs onto terminal cells.
//!
//! A terminal has one font size, so `size_percent` is dropped. Suppressed
//! delimiters (opacity 0) are not drawn at all, and anything else below
//! full opacity is dimmed.

use crossterm::style::{Attribute, Color as AnsiColor, ContentStyle};
use markdown_reveal_engine::{RenderOutput, Rgb, TextStyle};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub fn is_hidden(style: &TextStyle) -> bool {
    style.opacity_percent == 0
}

fn rgb(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

pub fn to_ratatui(style: &TextStyle) -> Style {
    let mut out = Style::default();
    if let Some(fg) = style.fg {
        out = out.fg(rgb(fg));
    }
    if let Some(bg) = style.bg {
        out = out.bg(rgb(bg));
    }
    let flags = [
        (style.bold, Modifier::BOLD),
        (style.italic, Modifier::ITALIC),
        (style.underline, Modifier::UNDERLINED),
        (style.strikethrough, Modifier::CROSSED_OUT),
        (style.opacity_percent < 100, Modifier::DIM),
    ];
    for (on, modifier) in flags {
        if on {
            out = out.add_modifier(modifier);
        }
    }
    out
}

pub fn to_ansi(style: &TextStyle) -> ContentStyle {
    let mut out = ContentStyle::new();
    out.foreground_color = style.fg.map(|Rgb(r, g, b)| AnsiColor::Rgb { r, g, b });
    out.background_color = style.bg.map(|Rgb(r, g, b)| AnsiColor::Rgb { r, g, b });
    let flags = [
        (style.bold, Attribute::Bold),
        (style.italic, Attribute::Italic),
        (style.underline, Attribute::Underlined),
        (style.strikethrough, Attribute::CrossedOut),
        (style.opacity_percent < 100, Attribute::Dim),
    ];
    for (on, attribute) in flags {
        if on {
            out.attributes.set(attribute);
        }
    }
    out
}

/// Visit every leaf of the engine output in source order.
fn for_each_leaf<'a>(output: &'a RenderOutput<'_>, mut f: impl FnMut(&'a str, &'a TextStyle)) {
    match output {
        RenderOutput::Styled(forest) => {
            for block in forest.iter() {
                for run in &block.runs {
                    run.for_each_leaf(&mut |text, _, style| f(text, style));
                }
            }
        }
        RenderOutput::Deferred(run) => run.for_each_leaf(&mut |text, _, style| f(text, style)),
    }
}

/// The output as ANSI-escaped text, for printing to a terminal.
pub fn ansi(output: &RenderOutput<'_>) -> String {
    let mut out = String::new();
    for_each_leaf(output, |text, style| {
        if is_hidden(style) {
            return;
        }
        // Style each line separately so backgrounds do not bleed past newlines
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if !line.is_empty() {
                out.push_str(&to_ansi(style).apply(line).to_string());
            }
        }
    });
    out
}

/// Output laid out as terminal lines.
#[derive(Debug, Default)]
pub struct Screen {
    pub lines: Vec<Line<'static>>,
    /// `(column, row)` of the source cursor, if it is on screen.
    pub cursor: Option<(u16, u16)>,
}

pub fn layout(output: &RenderOutput<'_>, cursor: Option<usize>) -> Screen {
    let mut screen = Screen::default();
    let mut line: Vec<Span<'static>> = Vec::new();
    let mut column = 0usize;
    let mut offset = 0usize;

    let position = |column: usize, row: usize| {
        Some((
            u16::try_from(column).unwrap_or(u16::MAX),
            u16::try_from(row).unwrap_or(u16::MAX),
        ))
    };

    for_each_leaf(output, |text, style| {
        let hidden = is_hidden(style);
        let style = to_ratatui(style);
        let mut pending = String::new();

        for (i, ch) in text.char_indices() {
            if !hidden && cursor == Some(offset + i) {
                screen.cursor = position(column, screen.lines.len());
            }
            match ch {
                '\n' => {
                    if !pending.is_empty() {
                        line.push(Span::styled(std::mem::take(&mut pending), style));
                    }
                    screen.lines.push(Line::from(std::mem::take(&mut line)));
                    column = 0;
                }
                '\r' => {}
                _ if hidden => {}
                _ => {
                    pending.push(ch);
                    column += 1;
                }
            }
        }
        if !pending.is_empty() {
            line.push(Span::styled(pending, style));
        }
        offset += text.len();
    });

    if screen.cursor.is_none() && cursor == Some(offset) {
        screen.cursor = position(column, screen.lines.len());
    }
    screen.lines.push(Line::from(line));
    screen
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_reveal_engine::{Document, StyleConfig, render_document};
    use pretty_assertions::assert_eq;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn screen_for(source: &str, cursor: Option<usize>) -> Screen {
        let doc = Document::parse(source);
        let active = cursor.and_then(|c| doc.block_index_at_offset(c));
        let forest = render_document(&doc, active, &StyleConfig::default());
        layout(&RenderOutput::Styled(&forest), cursor)
    }

    #[test]
    fn collapsed_blocks_drop_their_delimiters() {
        let screen = screen_for("# Title\n\nSome **bold**\n", None);
        let texts: Vec<_> = screen.lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["Title", "", "Some bold", ""]);
        assert_eq!(screen.cursor, None);
    }

    #[test]
    fn revealed_block_shows_syntax_and_cursor() {
        let screen = screen_for("# Title\n\nSome **bold**\n", Some(14));
        let texts: Vec<_> = screen.lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["Title", "", "Some **bold**", ""]);
        assert_eq!(screen.cursor, Some((5, 2)));
    }

    #[test]
    fn cursor_at_end_of_text() {
        let screen = screen_for("ab", Some(2));
        assert_eq!(screen.cursor, Some((2, 0)));
    }

    #[test]
    fn dimmed_delimiters_and_rgb_colors() {
        let styles = StyleConfig::default();
        let style = to_ratatui(&styles.delimiter_visible);
        assert!(style.add_modifier.contains(Modifier::DIM));

        let bold = to_ratatui(&TextStyle::default().bold().fg(Rgb(1, 2, 3)));
        assert_eq!(bold.fg, Some(Color::Rgb(1, 2, 3)));
        assert!(bold.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn ansi_output_skips_hidden_runs() {
        let doc = Document::parse("**x**\n");
        let forest = render_document(&doc, None, &StyleConfig::default());
        let text = ansi(&RenderOutput::Styled(&forest));
        assert!(!text.contains("**"));
        assert!(text.contains('x'));
        assert!(text.ends_with('\n'));
    }
}
