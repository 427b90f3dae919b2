//! Single-line stacked bar showing each status's share of the total

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Proportional bar of `(count, color)` segments
pub struct StatusBar<'a> {
    segments: &'a [(usize, Color)],
    empty_style: Style,
}

impl<'a> StatusBar<'a> {
    pub fn new(segments: &'a [(usize, Color)]) -> Self {
        Self {
            segments,
            empty_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn empty_style(mut self, style: Style) -> Self {
        self.empty_style = style;
        self
    }

    /// Cell width per segment; rounding leftovers go to the largest segments
    fn widths(&self, width: u16) -> Vec<u16> {
        let total: usize = self.segments.iter().map(|(count, _)| count).sum();
        if total == 0 {
            return vec![0; self.segments.len()];
        }
        let width = width as usize;
        let mut widths: Vec<usize> = self
            .segments
            .iter()
            .map(|(count, _)| count * width / total)
            .collect();
        let mut leftover = width - widths.iter().sum::<usize>();

        let mut order: Vec<usize> = (0..self.segments.len()).collect();
        order.sort_by(|a, b| self.segments[*b].0.cmp(&self.segments[*a].0));
        for idx in order {
            if leftover == 0 {
                break;
            }
            if self.segments[idx].0 > 0 {
                widths[idx] += 1;
                leftover -= 1;
            }
        }
        widths.into_iter().map(|w| w as u16).collect()
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let widths = self.widths(area.width);
        if widths.iter().all(|w| *w == 0) {
            for x in area.x..area.x + area.width {
                buf.get_mut(x, area.y).set_char('·').set_style(self.empty_style);
            }
            return;
        }

        let mut x = area.x;
        for ((_, color), width) in self.segments.iter().zip(widths) {
            for _ in 0..width {
                if x >= area.x + area.width {
                    return;
                }
                buf.get_mut(x, area.y)
                    .set_char('█')
                    .set_style(Style::default().fg(*color));
                x += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_fill_the_area() {
        let segments = [(1, Color::Red), (1, Color::Green), (1, Color::Blue)];
        let widths = StatusBar::new(&segments).widths(10);
        assert_eq!(widths.iter().sum::<u16>(), 10);
    }

    #[test]
    fn zero_counts_get_no_cells() {
        let segments = [(0, Color::Red), (3, Color::Green)];
        assert_eq!(StatusBar::new(&segments).widths(7), vec![0, 7]);
    }

    #[test]
    fn renders_placeholder_when_empty() {
        let segments = [(0, Color::Red)];
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(&segments).render(area, &mut buf);
        assert_eq!(buf.get(0, 0).symbol(), "·");
    }
}
