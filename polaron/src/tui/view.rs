use crate::middle::{ParamSet, Sequencer};
use crate::shared::{FunctionButton, LedFrame, NUM_TRACKS, PROJECT_SLOTS};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::grid::{draw_led_cell, draw_step_grid};

const TRACK_LABELS: [&str; NUM_TRACKS] = ["F1", "F2", "F3", "F4", "F5", "F6"];
const FUNCTION_KEYS: [&str; 8] = ["spc", "g", "h", "j", "k", "b", "n", "m"];

/// What the screen shows each frame, copied out of the engine and the slot store.
#[derive(Clone, Debug, Default)]
pub struct PanelView {
    pub leds: LedFrame,
    pub running: bool,
    pub midi_sync: bool,
    pub step_length: u32,
    pub param_set: usize,
    pub selected_track: usize,
    pub slot: usize,
    pub existing_slots: u16,
    pub active_slots: u16,
    pub message: String,
}

impl PanelView {
    pub fn capture(seq: &Sequencer, slot: usize, existing_slots: u16, active_slots: u16) -> Self {
        let param_set = match seq.param_set() {
            ParamSet::Set1 => 1,
            ParamSet::Set2 => 2,
            ParamSet::Set3 => 3,
        };
        Self {
            leds: *seq.leds(),
            running: seq.is_running(),
            midi_sync: seq.is_syncing_to_midi_clock(),
            step_length: seq.clock().step_length(),
            param_set,
            selected_track: seq.selected_track(),
            slot,
            existing_slots,
            active_slots,
            message: String::new(),
        }
    }

    fn status_line(&self) -> String {
        let transport = if self.running { "RUN " } else { "STOP" };
        let clock = if self.midi_sync { "midi".to_string() } else { format!("{} ms", self.step_length) };
        format!(
            "{transport}  clock {clock}  track {}  set {}  slot {:02} {}  {}",
            self.selected_track + 1,
            self.param_set,
            self.slot,
            slot_marker(self.slot, self.existing_slots, self.active_slots),
            self.message
        )
    }
}

// '*' loaded, '+' saved, '-' empty
fn slot_marker(slot: usize, existing: u16, active: u16) -> char {
    if slot >= PROJECT_SLOTS {
        '-'
    } else if active & (1 << slot) != 0 {
        '*'
    } else if existing & (1 << slot) != 0 {
        '+'
    } else {
        '-'
    }
}

pub fn render(frame: &mut Frame, area: Rect, view: &PanelView) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // status
            Constraint::Length(3), // function buttons
            Constraint::Length(3), // track buttons
            Constraint::Min(12),   // step grid
            Constraint::Length(2), // key help
        ])
        .split(area);

    let status = Paragraph::new(view.status_line())
        .block(Block::default().borders(Borders::ALL).title(" polaron "));
    frame.render_widget(status, sections[0]);

    draw_function_row(frame, sections[1], view);
    draw_track_row(frame, sections[2], view);
    draw_step_grid(frame, sections[3], &view.leds.steps);

    let help = Paragraph::new(vec![
        Line::from("knob1 [ ]  knob2 - =  slot , .  save F10  load F11  quit esc"),
    ]);
    frame.render_widget(help, sections[4]);
}

fn draw_function_row(frame: &mut Frame, area: Rect, view: &PanelView) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 8); 8])
        .split(area);
    for (button, cell) in FunctionButton::ALL.iter().zip(cells.iter()) {
        let label = format!("{} {}", button.label(), FUNCTION_KEYS[button.index()]);
        draw_led_cell(frame, *cell, &label, view.leds.function(*button));
    }
}

fn draw_track_row(frame: &mut Frame, area: Rect, view: &PanelView) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, NUM_TRACKS as u32); NUM_TRACKS])
        .split(area);
    for (i, cell) in cells.iter().enumerate() {
        draw_led_cell(frame, *cell, TRACK_LABELS[i], view.leds.tracks[i]);
    }
}
