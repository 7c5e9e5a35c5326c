use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// A bordered single-line input with its label in the border title.
pub struct TextField<'a> {
    label: &'a str,
    placeholder: &'a str,
    input: &'a LineInput,
    focused: bool,
    invalid: bool,
    theme: &'a Theme,
}

impl<'a> TextField<'a> {
    pub fn new(label: &'a str, input: &'a LineInput, theme: &'a Theme) -> Self {
        Self {
            label,
            placeholder: "",
            input,
            focused: false,
            invalid: false,
            theme,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }
}

impl Widget for TextField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border_color = if self.invalid {
            colors.warning()
        } else if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let text_style = Style::default()
            .fg(colors.fg())
            .add_modifier(Modifier::BOLD);
        let cursor_style = Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg());

        let line = if self.input.value().is_empty() && !self.focused {
            Line::from(Span::styled(
                self.placeholder,
                Style::default().fg(colors.text_muted()),
            ))
        } else if self.focused {
            let (before, cursor_ch, after) = self.input.render_parts();
            let cursor_text = cursor_ch.map(String::from).unwrap_or_else(|| " ".to_string());
            Line::from(vec![
                Span::styled(before, text_style),
                Span::styled(cursor_text, cursor_style),
                Span::styled(after, text_style),
            ])
        } else {
            Line::from(Span::styled(self.input.value(), text_style))
        };

        Paragraph::new(line).render(inner, buf);
    }
}
