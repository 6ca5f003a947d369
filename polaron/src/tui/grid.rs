use crate::shared::{Rgb, STEPS_PER_PATTERN};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const COLS: usize = 4;
const ROWS: usize = 4;

const PAD_LABELS: [&str; STEPS_PER_PATTERN] = [
    "1", "2", "3", "4",
    "Q", "W", "E", "R",
    "A", "S", "D", "F",
    "Z", "X", "C", "V",
];

// the 16 step buttons, four rows of four, each filled with its LED colour
pub fn draw_step_grid(frame: &mut Frame, area: Rect, leds: &[Rgb; STEPS_PER_PATTERN]) {
    let row_constraints = [Constraint::Percentage(25); ROWS];
    let col_constraints = [Constraint::Percentage(25); COLS];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (row_idx, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints)
            .split(*row_area);

        for (col_idx, cell_area) in cols.iter().enumerate() {
            let step = row_idx * COLS + col_idx;
            draw_led_cell(frame, *cell_area, PAD_LABELS[step], leds[step]);
        }
    }
}

pub fn draw_led_cell(frame: &mut Frame, area: Rect, label: &str, led: Rgb) {
    let style = led_style(led);
    let cell = Paragraph::new(label)
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(cell, area);
}

fn led_style(led: Rgb) -> Style {
    if led.is_off() {
        return Style::default().fg(Color::DarkGray);
    }
    // dark text on bright LEDs
    let luma = (led.r as u16 * 3 + led.g as u16 * 6 + led.b as u16) / 10;
    let fg = if luma > 110 { Color::Black } else { Color::White };
    Style::default().fg(fg).bg(Color::Rgb(led.r, led.g, led.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_style() {
        assert_eq!(led_style(Rgb::BLACK), Style::default().fg(Color::DarkGray));
        assert_eq!(led_style(Rgb::YELLOW).fg, Some(Color::Black));
        assert_eq!(led_style(Rgb::RED.nscale8(20)).fg, Some(Color::White));
        assert_eq!(led_style(Rgb::GREEN).bg, Some(Color::Rgb(0, 0x80, 0)));
    }
}
