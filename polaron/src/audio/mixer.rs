use log::trace;

use crate::audio_api::Mixer;
use crate::shared::NUM_TRACKS;

/// One side of the output mix: the last gain set per channel.
#[derive(Clone, Debug)]
pub struct LevelMixer {
    side: &'static str,
    gains: [f32; NUM_TRACKS],
}

impl LevelMixer {
    pub fn new(side: &'static str) -> Self {
        Self { side, gains: [0.5; NUM_TRACKS] }
    }

    pub fn gains(&self) -> &[f32; NUM_TRACKS] {
        &self.gains
    }
}

impl Mixer for LevelMixer {
    fn gain(&mut self, channel: usize, gain: f32) {
        // channels past the sixth don't exist on this mixer
        if let Some(slot) = self.gains.get_mut(channel) {
            *slot = gain.clamp(0.0, 1.0);
            trace!("mixer {} ch{channel} gain {gain:.3}", self.side);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_is_stored_and_clamped() {
        let mut mixer = LevelMixer::new("L");
        mixer.gain(2, 0.3);
        mixer.gain(3, 4.0);
        mixer.gain(9, 0.1);
        assert_eq!(mixer.gains()[2], 0.3);
        assert_eq!(mixer.gains()[3], 1.0);
        assert_eq!(mixer.gains()[0], 0.5);
    }
}
