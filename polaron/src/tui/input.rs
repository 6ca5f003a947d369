use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crate::shared::FunctionButton;
use super::mode::{Control, HostCommand, TuiState};

// drain every pending key event into tuistate, returning the host-level
// commands (quit/save/load) found along the way
pub fn poll_input(timeout: Duration, ts: &mut TuiState, knob_step: u16) -> anyhow::Result<Vec<HostCommand>> {
    let mut commands = Vec::new();
    if !event::poll(timeout)? {
        return Ok(commands);
    }
    loop {
        if let Event::Key(key) = event::read()? {
            commands.extend(handle_key(key, ts, knob_step as i32));
        }
        if !event::poll(Duration::ZERO)? {
            break;
        }
    }
    Ok(commands)
}

fn handle_key(key: KeyEvent, ts: &mut TuiState, knob_step: i32) -> Option<HostCommand> {
    if let Some(control) = control_for(key.code) {
        match key.kind {
            KeyEventKind::Press => ts.press(control),
            KeyEventKind::Release => ts.release(control),
            KeyEventKind::Repeat => {} // already down
        }
        return None;
    }
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Esc => return Some(HostCommand::Quit),
        KeyCode::F(10) => return Some(HostCommand::Save),
        KeyCode::F(11) => return Some(HostCommand::Load),

        // knobs nudge by knob_step, repeats keep turning
        KeyCode::Char('[') => ts.turn_knob(0, -knob_step),
        KeyCode::Char(']') => ts.turn_knob(0, knob_step),
        KeyCode::Char('-') => ts.turn_knob(1, -knob_step),
        KeyCode::Char('=') => ts.turn_knob(1, knob_step),

        KeyCode::Char(',') => ts.next_slot(false),
        KeyCode::Char('.') => ts.next_slot(true),
        _ => {}
    }
    None
}

// which panel button a key stands for
fn control_for(code: KeyCode) -> Option<Control> {
    let control = match code {
        KeyCode::Char(' ') => Control::Function(FunctionButton::StartStop),
        KeyCode::Char('g') => Control::Function(FunctionButton::TogglePlock),
        KeyCode::Char('h') => Control::Function(FunctionButton::ToggleMute),
        KeyCode::Char('j') => Control::Function(FunctionButton::SetTrackLength),
        KeyCode::Char('k') => Control::Function(FunctionButton::SetPattern),
        KeyCode::Char('b') => Control::Function(FunctionButton::SetParamSet1),
        KeyCode::Char('n') => Control::Function(FunctionButton::SetParamSet2),
        KeyCode::Char('m') => Control::Function(FunctionButton::SetParamSet3),
        KeyCode::F(n @ 1..=6) => Control::Track(n as usize - 1),
        KeyCode::Char(c) => Control::Step(char_to_pad(c)?),
        _ => return None,
    };
    Some(control)
}

// convert char to step index, laid out as the 4x4 grid on screen
fn char_to_pad(c: char) -> Option<usize> {
    let idx = match c {
        '1' => 0, '2' => 1, '3' => 2, '4' => 3,
        'q' => 4, 'w' => 5, 'e' => 6, 'r' => 7,
        'a' => 8, 's' => 9, 'd' => 10, 'f' => 11,
        'z' => 12, 'x' => 13, 'c' => 14, 'v' => 15,
        _ => return None,
    };
    Some(idx)
}
