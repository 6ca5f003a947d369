// Logical model of the front panel: edge-detecting buttons plus the two knobs.
mod analog;
mod button;

pub use analog::{AnalogController, DEADBAND};
pub use button::Button;

use crate::shared::{FunctionButton, PanelState, NUM_FUNCTION_BUTTONS, NUM_TRACKS, STEPS_PER_PATTERN};

#[derive(Clone, Debug, Default)]
pub struct InputSurface {
    function: [Button; NUM_FUNCTION_BUTTONS],
    tracks: [Button; NUM_TRACKS],
    steps: [Button; STEPS_PER_PATTERN],
    pub input1: AnalogController,
    pub input2: AnalogController,
}

impl InputSurface {
    pub fn poll(&mut self, panel: &PanelState) {
        for (button, &down) in self.function.iter_mut().zip(&panel.function) {
            button.update(down);
        }
        for (button, &down) in self.tracks.iter_mut().zip(&panel.tracks) {
            button.update(down);
        }
        for (button, &down) in self.steps.iter_mut().zip(&panel.steps) {
            button.update(down);
        }
        self.input1.update(panel.knobs[0]);
        self.input2.update(panel.knobs[1]);
    }

    pub fn function(&self, button: FunctionButton) -> &Button {
        &self.function[button.index()]
    }

    pub fn track(&self, index: usize) -> &Button {
        &self.tracks[index]
    }

    pub fn step(&self, index: usize) -> &Button {
        &self.steps[index]
    }

    pub fn deactivate_sensors(&mut self) {
        self.input1.deactivate();
        self.input2.deactivate();
    }

    pub fn any_sensor_active(&self) -> bool {
        self.input1.is_active() || self.input2.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_routes_buttons() {
        let mut surface = InputSurface::default();
        let panel = PanelState::default()
            .with_function(FunctionButton::ToggleMute, true)
            .with_track(2, true)
            .with_step(9, true);
        surface.poll(&panel);
        assert!(surface.function(FunctionButton::ToggleMute).rose());
        assert!(!surface.function(FunctionButton::StartStop).read());
        assert!(surface.track(2).read());
        assert!(surface.step(9).rose());
        surface.poll(&PanelState::default());
        assert!(surface.step(9).fell());
    }
}
