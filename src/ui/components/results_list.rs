use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::scoring;
use crate::engine::search::SearchResponse;
use crate::ui::theme::Theme;

/// Ranked words for the published response, or the searching / error / empty
/// status line when there is nothing to list.
pub struct ResultsList<'a> {
    response: Option<&'a SearchResponse>,
    searching: bool,
    scroll: usize,
    show_breakdown: bool,
    theme: &'a Theme,
}

impl<'a> ResultsList<'a> {
    pub fn new(response: Option<&'a SearchResponse>, searching: bool, theme: &'a Theme) -> Self {
        Self {
            response,
            searching,
            scroll: 0,
            show_breakdown: true,
            theme,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn show_breakdown(mut self, show: bool) -> Self {
        self.show_breakdown = show;
        self
    }
}

/// Clamp a scroll offset so the last page stays full.
pub fn clamp_scroll(scroll: usize, total_rows: usize, visible_rows: usize) -> usize {
    scroll.min(total_rows.saturating_sub(visible_rows))
}

impl Widget for ResultsList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let muted = Style::default().fg(colors.text_muted());

        let block = Block::bordered()
            .title(" Results ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let status = |text: String, style: Style| Paragraph::new(Line::from(Span::styled(text, style)));

        if self.searching {
            status("Searching...".to_string(), muted).render(inner, buf);
            return;
        }
        let Some(response) = self.response else {
            return;
        };
        if let Some(err) = &response.error {
            status(format!("Error: {err}"), Style::default().fg(colors.error())).render(inner, buf);
            return;
        }
        if response.results.is_empty() {
            status("No matches found.".to_string(), muted).render(inner, buf);
            return;
        }

        let mut lines = vec![Line::from(vec![
            Span::styled(response.summary(), Style::default().fg(colors.accent())),
            Span::styled(format!("  ({:.1}ms)", response.elapsed_ms), muted),
        ])];

        let visible = inner.height.saturating_sub(1) as usize;
        let scroll = clamp_scroll(self.scroll, response.results.len(), visible);
        let word_width = response
            .results
            .iter()
            .map(|w| w.word.chars().count())
            .max()
            .unwrap_or(0);

        for (i, entry) in response.results.iter().enumerate().skip(scroll).take(visible) {
            let mut spans = vec![
                Span::styled(format!("{:>4}  ", i + 1), muted),
                Span::styled(
                    format!(" {:<word_width$} ", entry.word),
                    Style::default()
                        .fg(colors.tile_fg())
                        .bg(colors.tile_bg())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {:>3} pts", entry.score),
                    Style::default()
                        .fg(colors.score())
                        .add_modifier(Modifier::BOLD),
                ),
            ];
            if self.show_breakdown {
                spans.push(Span::styled(
                    format!("  ({})", scoring::breakdown(&entry.word)),
                    muted,
                ));
            }
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dictionary::ScoredWord;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render(list: ResultsList<'_>) -> String {
        let area = Rect::new(0, 0, 70, 8);
        let mut buf = Buffer::empty(area);
        list.render(area, &mut buf);
        buffer_text(&buf)
    }

    fn response(words: &[&str], truncated: bool, error: Option<&str>) -> SearchResponse {
        SearchResponse {
            results: words.iter().map(|w| ScoredWord::new(*w)).collect(),
            truncated,
            elapsed_ms: 2.25,
            search_id: 1,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_clamp_scroll() {
        assert_eq!(clamp_scroll(50, 100, 10), 50);
        assert_eq!(clamp_scroll(95, 100, 10), 90);
        assert_eq!(clamp_scroll(3, 5, 10), 0);
    }

    #[test]
    fn test_renders_rows_with_breakdown() {
        let theme = Theme::default();
        let resp = response(&["QUO", "SALTER"], false, None);
        let text = render(ResultsList::new(Some(&resp), false, &theme));
        assert!(text.contains("2 matches found"));
        assert!(text.contains("(2.2ms)") || text.contains("(2.3ms)"));
        assert!(text.contains("QUO"));
        assert!(text.contains("12 pts"));
        assert!(text.contains("(10+1+1)"));
    }

    #[test]
    fn test_status_lines() {
        let theme = Theme::default();
        let text = render(ResultsList::new(None, true, &theme));
        assert!(text.contains("Searching..."));

        let failed = response(&[], false, Some("boom"));
        let text = render(ResultsList::new(Some(&failed), false, &theme));
        assert!(text.contains("Error: boom"));

        let empty = response(&[], false, None);
        let text = render(ResultsList::new(Some(&empty), false, &theme));
        assert!(text.contains("No matches found."));
    }
}
