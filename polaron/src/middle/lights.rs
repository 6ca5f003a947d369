// LED policy. The whole frame is rebuilt every tick from engine state, so the
// sink only has to ship it.
use super::{FunctionMode, ParamSet, Sequencer};
use crate::pipeline::StepState;
use crate::shared::{FunctionButton, Rgb, NUM_TRACKS, STEPS_PER_PATTERN};

const MUTE_DIM_FACTOR: u8 = 20;

pub fn color_for_step_state(state: StepState) -> Rgb {
    match state.bits() {
        1 => Rgb::CORNFLOWER_BLUE, // trigger on, plock rec off
        2 => Rgb::GREEN,           // trigger off, plock rec on
        3 => Rgb::DARK_ORANGE,     // both
        _ => Rgb::BLACK,
    }
}

impl Sequencer {
    pub(super) fn render_leds(&mut self, mode: FunctionMode) {
        self.has_active_plock_receivers = self
            .tracks
            .iter()
            .any(|t| t.current_pattern().is_in_plock_mode());

        self.leds.clear();
        self.render_function_lights(mode);
        self.render_track_lights(mode);
        self.render_step_lights(mode);
    }

    fn render_function_lights(&mut self, mode: FunctionMode) {
        let running = self.running;
        let blink_on = self.has_active_plock_receivers
            && (self.step_count % 2 == 0 || self.surface.any_sensor_active());
        let param_set = self.param_set;
        let leds = &mut self.leds;

        *leds.function_mut(FunctionButton::StartStop) = if running { Rgb::GREEN } else { Rgb::BLACK };

        if mode == FunctionMode::TogglePlocks || blink_on {
            *leds.function_mut(FunctionButton::TogglePlock) = Rgb::DARK_ORANGE;
        }
        if mode == FunctionMode::ToggleMutes {
            *leds.function_mut(FunctionButton::ToggleMute) = Rgb::CORNFLOWER_BLUE;
        }
        if mode == FunctionMode::SetTrackLength {
            *leds.function_mut(FunctionButton::SetTrackLength) = Rgb::CORNFLOWER_BLUE;
        }
        if mode == FunctionMode::PatternOps {
            *leds.function_mut(FunctionButton::SetPattern) = Rgb::CORNFLOWER_BLUE;
        }

        for (button, set) in [
            (FunctionButton::SetParamSet1, ParamSet::Set1),
            (FunctionButton::SetParamSet2, ParamSet::Set2),
            (FunctionButton::SetParamSet3, ParamSet::Set3),
        ] {
            *leds.function_mut(button) = if param_set == set { Rgb::GREEN } else { Rgb::CORNFLOWER_BLUE };
        }
    }

    fn render_track_lights(&mut self, mode: FunctionMode) {
        for i in 0..NUM_TRACKS {
            let track = &self.tracks[i];
            let color = match mode {
                FunctionMode::ToggleMutes if track.is_mute_armed() => {
                    // breathing: armed-to-mute fades down, armed-to-unmute fades up
                    let scale = if track.is_muted() { self.led_fader } else { 255 - self.led_fader };
                    Rgb::CORNFLOWER_BLUE.nscale8(scale)
                }
                FunctionMode::PatternOps if track.is_pattern_ops_armed() => {
                    Rgb::CORNFLOWER_BLUE.nscale8(255 - self.led_fader)
                }
                _ => self.default_track_light(i),
            };
            self.leds.tracks[i] = color;
        }
    }

    fn default_track_light(&self, i: usize) -> Rgb {
        let track = &self.tracks[i];
        let selected = i == self.selected_track;
        let color = if track.current_pattern().is_in_plock_mode() {
            if selected { Rgb::DARK_ORANGE } else { Rgb::YELLOW }
        } else if selected {
            Rgb::GREEN
        } else {
            Rgb::CORNFLOWER_BLUE
        };
        if track.is_muted() {
            color.nscale8(MUTE_DIM_FACTOR)
        } else {
            color
        }
    }

    fn render_step_lights(&mut self, mode: FunctionMode) {
        let track = &self.tracks[self.selected_track];
        let pattern = track.current_pattern();

        match mode {
            FunctionMode::PatternOps => {
                let current = track.current_pattern_index();
                for i in 0..STEPS_PER_PATTERN {
                    self.leds.steps[i] = if i == current { Rgb::RED } else { Rgb::BLACK };
                }
                if let Some(next) = self.next_pattern {
                    self.leds.steps[next] = Rgb::RED.nscale8(255 - self.led_fader);
                }
            }
            _ => {
                for i in 0..STEPS_PER_PATTERN {
                    self.leds.steps[i] = color_for_step_state(pattern.step(i).state);
                }
                if mode == FunctionMode::SetTrackLength {
                    self.leds.steps[pattern.track_length() - 1] = Rgb::RED;
                }
            }
        }

        // playhead
        if self.running {
            self.leds.steps[pattern.current_step()] = Rgb::RED;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_state_colours() {
        assert_eq!(color_for_step_state(StepState::from_bits(0)), Rgb::BLACK);
        assert_eq!(color_for_step_state(StepState::from_bits(1)), Rgb::CORNFLOWER_BLUE);
        assert_eq!(color_for_step_state(StepState::from_bits(2)), Rgb::GREEN);
        assert_eq!(color_for_step_state(StepState::from_bits(3)), Rgb::DARK_ORANGE);
    }
}
