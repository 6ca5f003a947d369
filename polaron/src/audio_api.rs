// The engine never sees the synthesis graph. Every instrument voice presents the
// same small capability set, and the two output mixers only take per-channel gains.
use crate::shared::{NUM_PARAMS, NUM_TRACKS};

pub trait Voice {
    /// `index` 0..6 maps to setParam1..setParam6; values are 0..=1023.
    fn set_param(&mut self, index: usize, value: u16);
    fn trigger(&mut self);
    fn set_volume(&mut self, value: u16);
    fn set_pan(&mut self, value: u16);
    fn output1_gain(&self) -> f32;
    fn output2_gain(&self) -> f32;
    /// Restores gains saved with a project.
    fn set_output_gains(&mut self, output1: f32, output2: f32);
}

pub trait Mixer {
    fn gain(&mut self, channel: usize, gain: f32);
}

/// The six voices plus the left/right mixers they feed.
pub struct VoiceBank {
    voices: [Box<dyn Voice>; NUM_TRACKS],
    mixer_l: Box<dyn Mixer>,
    mixer_r: Box<dyn Mixer>,
}

impl VoiceBank {
    pub fn new(
        voices: [Box<dyn Voice>; NUM_TRACKS],
        mixer_l: Box<dyn Mixer>,
        mixer_r: Box<dyn Mixer>,
    ) -> Self {
        Self { voices, mixer_l, mixer_r }
    }

    pub fn voice(&self, track: usize) -> &dyn Voice {
        self.voices[track].as_ref()
    }

    /// Pushes a step's parameter snapshot, then fires the voice.
    pub fn play(&mut self, track: usize, params: &[u16; NUM_PARAMS]) {
        let voice = &mut self.voices[track];
        for (index, &value) in params.iter().enumerate() {
            voice.set_param(index, value);
        }
        voice.trigger();
    }

    pub fn set_volume(&mut self, track: usize, value: u16) {
        self.voices[track].set_volume(value);
        self.push_gains(track);
    }

    pub fn set_pan(&mut self, track: usize, value: u16) {
        self.voices[track].set_pan(value);
        self.push_gains(track);
    }

    pub fn set_channel_gain(&mut self, track: usize, output1: f32, output2: f32) {
        self.voices[track].set_output_gains(output1, output2);
        self.push_gains(track);
    }

    pub fn push_gains(&mut self, track: usize) {
        let voice = &self.voices[track];
        let (g1, g2) = (voice.output1_gain(), voice.output2_gain());
        self.mixer_l.gain(track, g1);
        self.mixer_r.gain(track, g2);
    }
}

impl std::fmt::Debug for VoiceBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceBank").finish_non_exhaustive()
    }
}
