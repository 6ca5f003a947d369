// Mode handlers: what the track and step buttons mean under each held function button.
use log::debug;

use super::{ParamSet, Sequencer};
use crate::shared::{FunctionButton, NUM_TRACKS, STEPS_PER_PATTERN};

impl Sequencer {
    pub(super) fn check_param_set(&mut self) {
        let chosen = [
            (FunctionButton::SetParamSet1, ParamSet::Set1),
            (FunctionButton::SetParamSet2, ParamSet::Set2),
            (FunctionButton::SetParamSet3, ParamSet::Set3),
        ]
        .into_iter()
        .find(|(button, _)| self.surface.function(*button).rose());

        if let Some((_, set)) = chosen {
            self.param_set = set;
            // the knobs mean something else now
            self.surface.deactivate_sensors();
        }
    }

    /// Default step handling. A single press toggles the step on release.
    /// Holding one step and pressing others copies the first onto them.
    pub(super) fn do_set_triggers(&mut self) {
        let selected = self.selected_track;
        let mut a_button_is_pressed = false;

        for i in 0..STEPS_PER_PATTERN {
            let button = *self.surface.step(i);
            let pattern = self.tracks[selected].current_pattern_mut();
            if button.read() {
                a_button_is_pressed = true;
                match self.source_step {
                    None => self.source_step = Some(i),
                    Some(source) if source != i => {
                        let from = *pattern.step(source);
                        pattern.step_mut(i).copy_values_from(&from);
                        self.step_copy = true;
                    }
                    Some(_) => {}
                }
            }
            if button.fell() && !self.step_copy {
                pattern.step_mut(i).toggle_trigger_state();
            }
        }

        if !a_button_is_pressed {
            self.source_step = None;
            self.step_copy = false;
        }
    }

    /// Steps set the loop length; knob 1 sets tempo, knob 2 rotates the pattern.
    pub(super) fn do_set_track_length(&mut self) {
        let selected = self.selected_track;
        for i in 0..STEPS_PER_PATTERN {
            if self.surface.step(i).fell() {
                self.tracks[selected].current_pattern_mut().set_track_length(i + 1);
                debug!("track {selected}: length {}", i + 1);
            }
        }
        if self.surface.input1.is_active() {
            self.clock.set_step_length_from_raw(self.surface.input1.value());
        }
        if self.surface.input2.is_active() {
            let offset = STEPS_PER_PATTERN - (self.surface.input2.value() as usize / 64);
            self.tracks[selected].current_pattern_mut().set_offset(offset);
        }
    }

    /// Track buttons arm a whole pattern for plock recording, step buttons a
    /// single step of the selected track.
    pub(super) fn do_set_track_plock(&mut self) {
        for i in 0..NUM_TRACKS {
            if self.surface.track(i).fell() {
                self.tracks[i].current_pattern_mut().toggle_plock_mode();
                self.track_or_step_button_pressed = true;
            }
        }
        let selected = self.selected_track;
        for i in 0..STEPS_PER_PATTERN {
            if self.surface.step(i).fell() {
                self.tracks[selected]
                    .current_pattern_mut()
                    .step_mut(i)
                    .toggle_parameter_lock_record();
                self.track_or_step_button_pressed = true;
            }
        }
    }

    pub(super) fn do_turn_off_plock_mode(&mut self) {
        for track in &mut self.tracks {
            track.current_pattern_mut().turn_off_plock_mode();
        }
        self.surface.deactivate_sensors();
        debug!("plock recording cancelled on all tracks");
    }

    pub(super) fn do_toggle_track_mute_arm(&mut self) {
        for i in 0..NUM_TRACKS {
            if self.surface.track(i).fell() {
                self.tracks[i].toggle_mute_arm();
            }
        }
        self.advance_led_fader();
    }

    pub(super) fn do_update_mutes(&mut self) {
        for track in &mut self.tracks {
            track.activate_mute_arms();
        }
    }

    /// Track buttons arm tracks for pattern ops. Step buttons pick the next
    /// pattern, or with two held, copy the first pattern onto the others.
    pub(super) fn do_pattern_ops(&mut self) {
        self.advance_led_fader();
        for i in 0..NUM_TRACKS {
            if self.surface.track(i).fell() {
                self.tracks[i].toggle_pattern_ops_arm();
            }
        }

        let any_armed = self.any_pattern_ops_armed();
        let mut a_button_is_pressed = false;
        for i in 0..STEPS_PER_PATTERN {
            let button = *self.surface.step(i);
            if button.read() {
                a_button_is_pressed = true;
                match self.source_pattern {
                    None => self.source_pattern = Some(i),
                    Some(source) if source != i => {
                        for track in &mut self.tracks {
                            if !any_armed || track.is_pattern_ops_armed() {
                                track.copy_pattern(source, i);
                            }
                        }
                        self.pattern_copy = true;
                    }
                    Some(_) => {}
                }
            }
            if button.fell() && !self.pattern_copy {
                self.next_pattern = Some(i);
            }
        }

        if !a_button_is_pressed {
            self.source_pattern = None;
            self.pattern_copy = false;
        }
    }

    /// Commits the chosen pattern. With no track armed every track switches
    /// (and is unmuted); otherwise only the armed ones.
    pub(super) fn do_leave_pattern_ops(&mut self) {
        if let Some(next) = self.next_pattern {
            let any_armed = self.any_pattern_ops_armed();
            let running = self.running;
            for track in &mut self.tracks {
                if !any_armed {
                    track.un_mute();
                } else if !track.is_pattern_ops_armed() {
                    continue;
                }
                if running {
                    track.switch_to_pattern(next);
                } else {
                    track.select_pattern(next);
                }
            }
            debug!("pattern {next} {}", if running { "queued" } else { "selected" });
        }
        self.deactivate_all_pattern_ops_arms();
        self.next_pattern = None;
    }

    /// While a track button is held the knobs set its volume (1) and pan (2);
    /// releasing it selects the track.
    pub(super) fn do_set_track_selection(&mut self) {
        for i in 0..NUM_TRACKS {
            if self.surface.track(i).read() {
                if self.surface.input1.is_active() {
                    self.voices.set_volume(i, self.surface.input1.value());
                }
                if self.surface.input2.is_active() {
                    self.voices.set_pan(i, self.surface.input2.value());
                }
            }
            if self.surface.track(i).fell() {
                self.surface.deactivate_sensors();
                self.selected_track = i;
                debug!("track {i} selected");
            }
        }
    }

    fn advance_led_fader(&mut self) {
        self.led_fader += 1;
        if self.led_fader > 200 {
            self.led_fader = 10;
        }
    }
}
