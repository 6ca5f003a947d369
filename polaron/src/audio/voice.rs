use log::trace;

use crate::audio_api::Voice;
use crate::shared::{clip_param, NUM_PARAMS, PARAM_MAX};

/// A voice endpoint without a DSP graph behind it: it keeps the last
/// parameter snapshot, derives its two output gains from volume and pan,
/// and counts triggers. The desktop host plays through these.
#[derive(Clone, Debug)]
pub struct ParamVoice {
    name: &'static str,
    params: [u16; NUM_PARAMS],
    volume: u16,
    pan: u16,
    gain1: f32,
    gain2: f32,
    triggers: u64,
}

impl ParamVoice {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            params: [0; NUM_PARAMS],
            volume: PARAM_MAX,
            pan: PARAM_MAX / 2,
            gain1: 0.5,
            gain2: 0.5,
            triggers: 0,
        }
    }

    pub fn params(&self) -> &[u16; NUM_PARAMS] {
        &self.params
    }

    pub fn triggers(&self) -> u64 {
        self.triggers
    }

    // linear pan law, pan 0 = all output1
    fn recalc_gains(&mut self) {
        let v = self.volume as f32 / PARAM_MAX as f32;
        let p = self.pan as f32 / PARAM_MAX as f32;
        self.gain1 = v * (1.0 - p);
        self.gain2 = v * p;
    }
}

impl Voice for ParamVoice {
    fn set_param(&mut self, index: usize, value: u16) {
        self.params[index % NUM_PARAMS] = clip_param(value);
    }

    fn trigger(&mut self) {
        self.triggers += 1;
        trace!("{} triggered {:?}", self.name, self.params);
    }

    fn set_volume(&mut self, value: u16) {
        self.volume = clip_param(value);
        self.recalc_gains();
    }

    fn set_pan(&mut self, value: u16) {
        self.pan = clip_param(value);
        self.recalc_gains();
    }

    fn output1_gain(&self) -> f32 {
        self.gain1
    }

    fn output2_gain(&self) -> f32 {
        self.gain2
    }

    fn set_output_gains(&mut self, output1: f32, output2: f32) {
        self.gain1 = output1.clamp(0.0, 1.0);
        self.gain2 = output2.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pan_hard_left() {
        let mut v = ParamVoice::new("kick");
        v.set_pan(0);
        assert_eq!(v.output1_gain(), 1.0);
        assert_eq!(v.output2_gain(), 0.0);
    }

    #[test]
    fn test_volume_scales_both_outputs() {
        let mut v = ParamVoice::new("snare");
        v.set_pan(PARAM_MAX);
        v.set_volume(0);
        assert_eq!(v.output1_gain(), 0.0);
        assert_eq!(v.output2_gain(), 0.0);
    }

    #[test]
    fn test_trigger_keeps_snapshot() {
        let mut v = ParamVoice::new("hat");
        v.set_param(5, 2048);
        v.trigger();
        assert_eq!(v.params()[5], PARAM_MAX);
        assert_eq!(v.triggers(), 1);
    }
}
