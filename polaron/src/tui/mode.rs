use crate::shared::{FunctionButton, PanelState, PARAM_MAX, PROJECT_SLOTS};

/// A front-panel control the keyboard can reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Function(FunctionButton),
    Track(usize),
    Step(usize),
}

/// Things only the host does; the engine never sees these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostCommand {
    Quit,
    Save,
    Load,
}

// state local to tui: which simulated buttons are down and where the knobs sit.
// Terminals that report key releases give real holds; the others give taps on
// step/track keys and press-again-to-release on function keys.
#[derive(Clone, Debug)]
pub struct TuiState {
    held: PanelState,
    // pressed for exactly one scan
    taps: PanelState,
    pub release_reported: bool,
    pub slot: usize,
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            held: PanelState::default().with_knobs(PARAM_MAX / 2, PARAM_MAX / 2),
            taps: PanelState::default(),
            release_reported: false,
            slot: 0,
        }
    }
}

impl TuiState {
    pub fn new(release_reported: bool, slot: usize) -> Self {
        Self {
            release_reported,
            slot: slot.min(PROJECT_SLOTS - 1),
            ..Self::default()
        }
    }

    pub fn press(&mut self, control: Control) {
        if self.release_reported {
            self.held = set(self.held, control, true);
            return;
        }
        match control {
            Control::Function(button) => {
                let down = self.held.function[button.index()];
                self.held = set(self.held, control, !down);
            }
            Control::Track(_) | Control::Step(_) => {
                self.taps = set(self.taps, control, true);
            }
        }
    }

    pub fn release(&mut self, control: Control) {
        if self.release_reported {
            self.held = set(self.held, control, false);
        }
    }

    pub fn turn_knob(&mut self, knob: usize, delta: i32) {
        let current = self.held.knobs[knob] as i32;
        self.held.knobs[knob] = (current + delta).clamp(0, PARAM_MAX as i32) as u16;
    }

    pub fn next_slot(&mut self, forward: bool) {
        self.slot = if forward {
            (self.slot + 1) % PROJECT_SLOTS
        } else {
            (self.slot + PROJECT_SLOTS - 1) % PROJECT_SLOTS
        };
    }

    /// The panel as the engine should see it this tick. Taps are consumed.
    pub fn scan(&mut self) -> PanelState {
        let mut panel = self.held;
        for (down, tap) in panel.tracks.iter_mut().zip(self.taps.tracks) {
            *down |= tap;
        }
        for (down, tap) in panel.steps.iter_mut().zip(self.taps.steps) {
            *down |= tap;
        }
        self.taps = PanelState::default();
        panel
    }
}

fn set(panel: PanelState, control: Control, down: bool) -> PanelState {
    match control {
        Control::Function(button) => panel.with_function(button, down),
        Control::Track(i) => panel.with_track(i, down),
        Control::Step(i) => panel.with_step(i, down),
    }
}
