// Purely for testing: voices and mixers that write what they were told into a shared log.
use std::cell::RefCell;
use std::rc::Rc;

use crate::audio_api::{Mixer, Voice, VoiceBank};
use crate::middle::Sequencer;
use crate::shared::NUM_TRACKS;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Param { track: usize, index: usize, value: u16 },
    Trigger { track: usize },
    Volume { track: usize, value: u16 },
    Pan { track: usize, value: u16 },
    Gains { track: usize },
    MixerL { channel: usize, gain: f32 },
    MixerR { channel: usize, gain: f32 },
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

struct RecordingVoice {
    track: usize,
    log: CallLog,
    gains: (f32, f32),
}

impl Voice for RecordingVoice {
    fn set_param(&mut self, index: usize, value: u16) {
        self.log.borrow_mut().push(Call::Param { track: self.track, index, value });
    }

    fn trigger(&mut self) {
        self.log.borrow_mut().push(Call::Trigger { track: self.track });
    }

    fn set_volume(&mut self, value: u16) {
        self.gains = (value as f32 / 1023.0, self.gains.1);
        self.log.borrow_mut().push(Call::Volume { track: self.track, value });
    }

    fn set_pan(&mut self, value: u16) {
        self.gains = (self.gains.0, value as f32 / 1023.0);
        self.log.borrow_mut().push(Call::Pan { track: self.track, value });
    }

    fn output1_gain(&self) -> f32 {
        self.gains.0
    }

    fn output2_gain(&self) -> f32 {
        self.gains.1
    }

    fn set_output_gains(&mut self, output1: f32, output2: f32) {
        self.gains = (output1, output2);
        self.log.borrow_mut().push(Call::Gains { track: self.track });
    }
}

struct RecordingMixer {
    left: bool,
    log: CallLog,
}

impl Mixer for RecordingMixer {
    fn gain(&mut self, channel: usize, gain: f32) {
        let call = if self.left {
            Call::MixerL { channel, gain }
        } else {
            Call::MixerR { channel, gain }
        };
        self.log.borrow_mut().push(call);
    }
}

pub fn recording_sequencer() -> (Sequencer, CallLog) {
    let log = CallLog::default();
    let voices: [Box<dyn Voice>; NUM_TRACKS] = std::array::from_fn(|track| {
        Box::new(RecordingVoice { track, log: log.clone(), gains: (0.5, 0.5) }) as Box<dyn Voice>
    });
    let bank = VoiceBank::new(
        voices,
        Box::new(RecordingMixer { left: true, log: log.clone() }),
        Box::new(RecordingMixer { left: false, log: log.clone() }),
    );
    (Sequencer::new(bank), log)
}

pub fn triggered_tracks(log: &CallLog) -> Vec<usize> {
    log.borrow()
        .iter()
        .filter_map(|c| match c {
            Call::Trigger { track } => Some(*track),
            _ => None,
        })
        .collect()
}
