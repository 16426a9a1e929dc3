//! Inline colour tags in frame text.
//!
//! `[#rrggbb:#rrggbb]` switches foreground and background for the text that
//! follows; either side may be `-` to fall back to the base style. Anything
//! in brackets that is not a valid tag is kept as literal text.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Split one line of tagged text into styled spans.
pub fn parse_line(line: &str, base: Style) -> Line<'static> {
    let mut spans = Vec::new();
    let mut style = base;
    let mut text = String::new();
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        text.push_str(&rest[..open]);
        let tail = &rest[open..];
        let tag = tail
            .find(']')
            .and_then(|close| parse_tag(&tail[1..close], base).map(|s| (close, s)));
        match tag {
            Some((close, next)) => {
                if !text.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut text), style));
                }
                style = next;
                rest = &tail[close + 1..];
            }
            None => {
                text.push('[');
                rest = &tail[1..];
            }
        }
    }
    text.push_str(rest);
    if !text.is_empty() {
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

fn parse_tag(tag: &str, base: Style) -> Option<Style> {
    let (fg, bg) = tag.split_once(':')?;
    let mut style = base;
    style.fg = parse_color(fg, base.fg)?;
    style.bg = parse_color(bg, base.bg)?;
    Some(style)
}

fn parse_color(value: &str, default: Option<Color>) -> Option<Option<Color>> {
    if value == "-" {
        return Some(default);
    }
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Style {
        Style::default().fg(Color::White)
    }

    #[test]
    fn test_plain_text_uses_base() {
        let line = parse_line("hello", base());
        assert_eq!(line.spans, vec![Span::styled("hello", base())]);
    }

    #[test]
    fn test_tags_switch_colours() {
        let line = parse_line("[#ff0000:#000010]ab[-:-]c", base());
        assert_eq!(
            line.spans,
            vec![
                Span::styled("ab", base().bg(Color::Rgb(0, 0, 16)).fg(Color::Rgb(255, 0, 0))),
                Span::styled("c", base()),
            ]
        );
    }

    #[test]
    fn test_malformed_tags_are_literal() {
        let line = parse_line("[x] [#12:#34] [", base());
        assert_eq!(line.spans, vec![Span::styled("[x] [#12:#34] [", base())]);
    }

    #[test]
    fn test_empty_line() {
        assert!(parse_line("", base()).spans.is_empty());
    }
}
