// The sequencer control engine. One `update_state` call per input poll:
// poll panel -> classify mode -> run mode handler -> clock -> step -> trigger -> LEDs.
// Nothing in here blocks or fails; every input has a defined outcome.
mod clock;
mod handlers;
mod lights;
mod mode;


pub use clock::{Clock, PulseFlag, DEFAULT_STEP_LENGTH, MAX_STEP_LENGTH, MIN_STEP_LENGTH, PULSES_PER_STEP};
pub use mode::FunctionMode;

use log::{info, trace};

use crate::audio_api::VoiceBank;
use crate::panel::InputSurface;
use crate::pipeline::Track;
use crate::shared::{FunctionButton, LedFrame, PanelState, NUM_TRACKS};

pub const MIDI_CLOCK: u8 = 0xF8;
pub const MIDI_START: u8 = 0xFA;
pub const MIDI_CONTINUE: u8 = 0xFB;
pub const MIDI_STOP: u8 = 0xFC;

/// Which parameter pair the two knobs record into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParamSet {
    #[default]
    Set1,
    Set2,
    Set3,
}

impl ParamSet {
    /// Zero based parameter indices for knob 1 and knob 2.
    pub fn param_indices(self) -> (usize, usize) {
        match self {
            ParamSet::Set1 => (0, 1),
            ParamSet::Set2 => (2, 3),
            ParamSet::Set3 => (4, 5),
        }
    }
}

#[derive(Debug)]
pub struct Sequencer {
    tracks: [Track; NUM_TRACKS],
    voices: VoiceBank,
    surface: InputSurface,
    clock: Clock,
    leds: LedFrame,
    mode: FunctionMode,

    // timing
    now: u64,
    step_count: u32,

    param_set: ParamSet,
    selected_track: usize,

    // transient editing state
    source_step: Option<usize>,
    step_copy: bool,
    source_pattern: Option<usize>,
    pattern_copy: bool,
    next_pattern: Option<usize>,
    track_or_step_button_pressed: bool,

    running: bool,
    trigger_sounds: bool,
    has_active_plock_receivers: bool,
    led_fader: u8,
}

impl Sequencer {
    pub fn new(voices: VoiceBank) -> Self {
        Self {
            tracks: std::array::from_fn(Track::new),
            voices,
            surface: InputSurface::default(),
            clock: Clock::default(),
            leds: LedFrame::default(),
            mode: FunctionMode::DefaultMode,
            now: 0,
            step_count: 0,
            param_set: ParamSet::Set1,
            selected_track: 0,
            source_step: None,
            step_copy: false,
            source_pattern: None,
            pattern_copy: false,
            next_pattern: None,
            track_or_step_button_pressed: false,
            running: false,
            trigger_sounds: false,
            has_active_plock_receivers: false,
            led_fader: 0,
        }
    }

    /// One engine tick. `now` is a monotonic millisecond timestamp.
    pub fn update_state(&mut self, panel: &PanelState, now: u64) {
        self.now = now;
        self.surface.poll(panel);
        self.check_param_set();

        // a fresh plock press starts a new gesture whatever mode this tick lands in
        if self.surface.function(FunctionButton::TogglePlock).rose() {
            self.track_or_step_button_pressed = false;
        }
        let mode = FunctionMode::classify(&self.surface, self.track_or_step_button_pressed);
        self.mode = mode;
        match mode {
            FunctionMode::StartStop => self.do_start_stop(),
            FunctionMode::SetTrackLength => self.do_set_track_length(),
            FunctionMode::TogglePlocks => self.do_set_track_plock(),
            FunctionMode::LeaveTogglePlocks => self.do_turn_off_plock_mode(),
            FunctionMode::ToggleMutes => self.do_toggle_track_mute_arm(),
            FunctionMode::LeaveToggleMutes => self.do_update_mutes(),
            FunctionMode::PatternOps => self.do_pattern_ops(),
            FunctionMode::LeavePatternOps => self.do_leave_pattern_ops(),
            FunctionMode::DefaultMode => {}
        }

        if mode.handles_track_selection() {
            self.do_set_track_selection();
        }
        if mode.handles_step_triggers() {
            self.do_set_triggers();
        }

        if self.running {
            if self.clock.should_step(now) {
                self.do_step();
            }
            // independent of do_step: right after start we trigger without stepping
            //   0              1              2
            //   Trigger....StepTrigger....StepTrigger....
            if self.trigger_sounds {
                self.do_trigger_sounds();
            }
        }

        self.render_leds(mode);
    }

    /// Advances every track by one step and schedules the trigger phase.
    pub fn do_step(&mut self) {
        for track in &mut self.tracks {
            track.do_step();
        }
        self.trigger_sounds = true;
        self.step_count = self.step_count.wrapping_add(1);
        trace!("step {}", self.step_count);
    }

    /// Records plocks from the active knobs into the current steps, then
    /// fires every unmuted track whose current step triggers.
    pub fn do_trigger_sounds(&mut self) {
        let (param_a, param_b) = self.param_set.param_indices();
        let input1 = self.surface.input1;
        let input2 = self.surface.input2;

        for (i, track) in self.tracks.iter_mut().enumerate() {
            let muted = track.is_muted();
            let step = track.current_step_mut();
            if step.is_parameter_lock_on() {
                if input1.is_active() {
                    step.set_param(param_a, input1.value());
                }
                if input2.is_active() {
                    step.set_param(param_b, input2.value());
                }
            }
            if !muted && step.is_trigger_on() {
                self.voices.play(i, step.params());
            }
        }
        self.trigger_sounds = false;
    }

    pub fn start(&mut self) {
        if !self.running {
            self.do_start_stop();
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.do_start_stop();
        }
    }

    fn do_start_stop(&mut self) {
        self.running = !self.running;
        if self.running {
            self.trigger_sounds = true;
            self.clock.start(self.now);
            info!("started (step length {} ms)", self.clock.step_length());
        } else {
            for track in &mut self.tracks {
                track.on_stop();
            }
            self.clock.stop();
            self.step_count = 0;
            info!("stopped");
        }
    }

    /// Real-time MIDI bytes. Clock, start, continue and stop are understood,
    /// anything else is dropped.
    pub fn on_midi_input(&mut self, byte: u8) {
        match byte {
            MIDI_CLOCK => self.clock.raise_pulse(),
            MIDI_START => {
                if !self.clock.is_syncing() {
                    info!("following MIDI clock");
                }
                self.clock.enter_sync();
                self.start();
            }
            MIDI_CONTINUE => {
                self.clock.enter_sync();
                if !self.running {
                    // resume where the cursors are. A stop rewinds them, and
                    // the downbeat they rest on has not sounded yet
                    self.trigger_sounds = self
                        .tracks
                        .iter()
                        .all(|track| track.current_pattern().current_step() == 0);
                    self.running = true;
                    self.clock.start(self.now);
                    info!("continued on MIDI clock");
                }
            }
            MIDI_STOP => {
                self.clock.leave_sync();
                self.stop();
                info!("left MIDI clock");
            }
            _ => {}
        }
    }

    /// Handle for a MIDI receiver on another thread to raise clock pulses
    /// without going through `on_midi_input`.
    pub fn midi_pulse_flag(&self) -> PulseFlag {
        self.clock.pulse_flag()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_syncing_to_midi_clock(&self) -> bool {
        self.clock.is_syncing()
    }

    pub fn trigger_sounds_pending(&self) -> bool {
        self.trigger_sounds
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn mode(&self) -> FunctionMode {
        self.mode
    }

    pub fn param_set(&self) -> ParamSet {
        self.param_set
    }

    pub fn selected_track(&self) -> usize {
        self.selected_track
    }

    pub fn queued_pattern_choice(&self) -> Option<usize> {
        self.next_pattern
    }

    pub fn has_active_plock_receivers(&self) -> bool {
        self.has_active_plock_receivers
    }

    pub fn tracks(&self) -> &[Track; NUM_TRACKS] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> &Track {
        &self.tracks[index % NUM_TRACKS]
    }

    pub fn track_mut(&mut self, index: usize) -> &mut Track {
        &mut self.tracks[index % NUM_TRACKS]
    }

    pub fn surface(&self) -> &InputSurface {
        &self.surface
    }

    pub fn leds(&self) -> &LedFrame {
        &self.leds
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn voices(&self) -> &VoiceBank {
        &self.voices
    }

    pub fn voices_mut(&mut self) -> &mut VoiceBank {
        &mut self.voices
    }

    /// True when any pattern-ops arm is set; the arms pick which tracks take
    /// part in the next pattern switch or copy.
    pub fn any_pattern_ops_armed(&self) -> bool {
        self.tracks.iter().any(Track::is_pattern_ops_armed)
    }

    pub fn deactivate_all_pattern_ops_arms(&mut self) {
        for track in &mut self.tracks {
            track.disarm_pattern_ops();
        }
    }
}
