// The persisted shape of a project: everything the sequencer needs to come back
// the way it was, minus transport and editing state.

use serde::{Deserialize, Serialize};

use super::step::{StepState, DEFAULT_TRIGGER_MASK};
use crate::middle::Sequencer;
use crate::shared::{NUM_PARAMS, NUM_PATTERNS, NUM_TRACKS, PARAM_MAX, STEPS_PER_PATTERN};

// Every record defaults field by field, so a document that lost keys (or was
// written by an older build) still loads what it has. Integers are read wide
// and narrowed in `apply`; an out-of-range number is clamped, never a parse
// error that costs the rest of the document.

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDocument {
    // absent means the clock keeps its current tempo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<GlobalRecord>,
    pub tracks: Vec<TrackRecord>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalRecord {
    pub step_length: i64,
    // carried only; the clock doesn't swing
    pub swing: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackRecord {
    pub output1_gain: f32,
    pub output2_gain: f32,
    pub patterns: Vec<PatternRecord>,
}

impl Default for TrackRecord {
    fn default() -> Self {
        Self {
            output1_gain: 0.5,
            output2_gain: 0.5,
            patterns: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternRecord {
    // derived from the steps on save, only read back when a step has no `state`
    pub trigger_state: i64,
    pub p_lock_arm_state: i64,
    pub offset: i64,
    pub track_length: i64,
    pub auto_mutate: bool,
    pub steps: Vec<StepRecord>,
}

impl Default for PatternRecord {
    fn default() -> Self {
        Self {
            trigger_state: 0,
            p_lock_arm_state: 0,
            offset: 0,
            track_length: STEPS_PER_PATTERN as i64,
            auto_mutate: false,
            steps: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StepRecord {
    pub trigger_mask: i64,
    pub params: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<i64>,
}

impl Default for StepRecord {
    fn default() -> Self {
        Self {
            trigger_mask: DEFAULT_TRIGGER_MASK as i64,
            params: Vec::new(),
            state: None,
        }
    }
}

impl ProjectDocument {
    /// Snapshot of the sequencer's musical content and channel gains.
    pub fn capture(seq: &Sequencer) -> Self {
        let global = GlobalRecord {
            step_length: seq.clock().step_length() as i64,
            swing: seq.clock().swing() as i64,
        };

        let tracks = seq
            .tracks()
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let voice = seq.voices().voice(i);
                let patterns = (0..NUM_PATTERNS)
                    .map(|p| {
                        let pattern = track.pattern(p);
                        PatternRecord {
                            trigger_state: pattern.trigger_state() as i64,
                            p_lock_arm_state: pattern.plock_arm_state() as i64,
                            offset: pattern.offset() as i64,
                            track_length: pattern.track_length() as i64,
                            auto_mutate: pattern.auto_mutate,
                            steps: pattern
                                .steps()
                                .iter()
                                .map(|step| StepRecord {
                                    trigger_mask: step.trigger_mask as i64,
                                    params: step.params().iter().map(|&v| v as i64).collect(),
                                    state: Some(step.state.bits() as i64),
                                })
                                .collect(),
                        }
                    })
                    .collect();
                TrackRecord {
                    output1_gain: voice.output1_gain(),
                    output2_gain: voice.output2_gain(),
                    patterns,
                }
            })
            .collect();

        Self {
            global: Some(global),
            tracks,
        }
    }

    /// Writes the document into the sequencer. Records past the sequencer's
    /// fixed sizes are ignored, missing ones leave the current content alone.
    pub fn apply(&self, seq: &mut Sequencer) {
        if let Some(global) = &self.global {
            seq.clock_mut()
                .set_step_length(global.step_length.clamp(0, u32::MAX as i64) as u32);
            seq.clock_mut()
                .set_swing(global.swing.clamp(i32::MIN as i64, i32::MAX as i64) as i32);
        }

        for (i, record) in self.tracks.iter().take(NUM_TRACKS).enumerate() {
            seq.voices_mut()
                .set_channel_gain(i, record.output1_gain, record.output2_gain);

            let track = seq.track_mut(i);
            for (p, pattern_record) in record.patterns.iter().take(NUM_PATTERNS).enumerate() {
                let pattern = track.pattern_mut(p);
                pattern.set_track_length(clamp_index(pattern_record.track_length));
                pattern.set_offset(clamp_index(pattern_record.offset));
                pattern.auto_mutate = pattern_record.auto_mutate;

                for (s, step_record) in pattern_record.steps.iter().take(STEPS_PER_PATTERN).enumerate() {
                    let state = step_record.state.unwrap_or_else(|| {
                        let trigger = (pattern_record.trigger_state >> s) & 1;
                        let plock = (pattern_record.p_lock_arm_state >> s) & 1;
                        trigger * StepState::TRIGGER as i64 | plock * StepState::PLOCK as i64
                    });
                    let step = pattern.step_mut(s);
                    step.state = StepState::from_bits((state & 0b11) as u8);
                    step.trigger_mask = (step_record.trigger_mask & DEFAULT_TRIGGER_MASK as i64) as u8;
                    for (k, &value) in step_record.params.iter().take(NUM_PARAMS).enumerate() {
                        step.set_param(k, value.clamp(0, PARAM_MAX as i64) as u16);
                    }
                }
            }
        }
    }
}

// lengths and offsets live in 0..=16
fn clamp_index(value: i64) -> usize {
    value.clamp(0, STEPS_PER_PATTERN as i64) as usize
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixture::{recording_sequencer, Call};

    #[test]
    fn test_capture_apply_round_trip() {
        let (mut seq, _log) = recording_sequencer();
        seq.clock_mut().set_step_length(200);
        seq.clock_mut().set_swing(3);
        {
            let pattern = seq.track_mut(4).pattern_mut(7);
            pattern.set_track_length(12);
            pattern.set_offset(5);
            pattern.auto_mutate = true;
            let step = pattern.step_mut(2);
            step.toggle_trigger_state();
            step.toggle_parameter_lock_record();
            step.trigger_mask = 0b101;
            step.set_param(5, 1000);
        }
        seq.voices_mut().set_channel_gain(1, 0.25, 0.75);

        let json = serde_json::to_string(&ProjectDocument::capture(&seq)).unwrap();
        let doc: ProjectDocument = serde_json::from_str(&json).unwrap();

        let (mut fresh, log) = recording_sequencer();
        doc.apply(&mut fresh);

        assert_eq!(fresh.clock().step_length(), 200);
        assert_eq!(fresh.clock().swing(), 3);
        assert_eq!(fresh.track(4).pattern(7), seq.track(4).pattern(7));
        assert_eq!(fresh.voices().voice(1).output1_gain(), 0.25);
        assert!(log.borrow().contains(&Call::MixerR { channel: 1, gain: 0.75 }));
    }

    #[test]
    fn test_masks_are_recomputed_on_capture() {
        let (mut seq, _log) = recording_sequencer();
        seq.track_mut(0).pattern_mut(0).step_mut(3).toggle_trigger_state();
        seq.track_mut(0).pattern_mut(0).step_mut(5).toggle_parameter_lock_record();
        let doc = ProjectDocument::capture(&seq);
        let record = &doc.tracks[0].patterns[0];
        assert_eq!(record.trigger_state, 1 << 3);
        assert_eq!(record.p_lock_arm_state, 1 << 5);
    }

    #[test]
    fn test_masks_fill_in_missing_step_state() {
        let json = r#"{
            "tracks": [{
                "patterns": [{
                    "triggerState": 5,
                    "pLockArmState": 4,
                    "steps": [{}, {}, {"params": [1, 2]}]
                }]
            }]
        }"#;
        let doc: ProjectDocument = serde_json::from_str(json).unwrap();
        let (mut seq, _log) = recording_sequencer();
        doc.apply(&mut seq);

        let pattern = seq.track(0).pattern(0);
        assert!(pattern.step(0).is_trigger_on());
        assert!(!pattern.step(1).is_trigger_on());
        assert_eq!(pattern.step(2).state.bits(), 0b11);
        assert_eq!(pattern.step(2).param(1), 2);
        assert_eq!(pattern.step(2).trigger_mask, DEFAULT_TRIGGER_MASK);
        assert_eq!(pattern.track_length(), STEPS_PER_PATTERN);
    }

    #[test]
    fn test_explicit_state_wins_over_masks() {
        let json = r#"{"tracks":[{"patterns":[{"triggerState":1,"steps":[{"state":2}]}]}]}"#;
        let doc: ProjectDocument = serde_json::from_str(json).unwrap();
        let (mut seq, _log) = recording_sequencer();
        doc.apply(&mut seq);
        let step = seq.track(0).pattern(0).step(0);
        assert!(!step.is_trigger_on());
        assert!(step.is_parameter_lock_on());
    }

    #[test]
    fn test_empty_document_takes_defaults() {
        let doc: ProjectDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc.global, None);
        let (mut seq, _log) = recording_sequencer();
        seq.clock_mut().set_step_length(200);
        seq.track_mut(2).pattern_mut(0).step_mut(0).toggle_trigger_state();
        doc.apply(&mut seq);
        // no global record, so the tempo stays
        assert_eq!(seq.clock().step_length(), 200);
        // no track records, so the content is untouched
        assert!(seq.track(2).pattern(0).step(0).is_trigger_on());

        let track: TrackRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(track.output1_gain, 0.5);
        let pattern: PatternRecord = serde_json::from_str(r#"{"autoMutate":true}"#).unwrap();
        assert_eq!(pattern.track_length, 16);
        assert!(pattern.auto_mutate);
    }

    #[test]
    fn test_params_are_clipped_on_load() {
        let json = r#"{"tracks":[{"patterns":[{"steps":[{"params":[4000,0,0,0,0,0,9]}]}]}]}"#;
        let doc: ProjectDocument = serde_json::from_str(json).unwrap();
        let (mut seq, _log) = recording_sequencer();
        doc.apply(&mut seq);
        assert_eq!(seq.track(0).pattern(0).step(0).param(0), 1023);
    }

    #[test]
    fn test_global_without_step_length_clamps_to_fastest() {
        let doc: ProjectDocument = serde_json::from_str(r#"{"global":{}}"#).unwrap();
        let (mut seq, _log) = recording_sequencer();
        doc.apply(&mut seq);
        assert_eq!(seq.clock().step_length(), crate::middle::MIN_STEP_LENGTH);
    }

    #[test]
    fn test_out_of_range_numbers_are_clamped_not_rejected() {
        let json = r#"{
            "global": {"stepLength": 9000000000, "swing": -3},
            "tracks": [{
                "patterns": [{
                    "offset": 40,
                    "trackLength": -2,
                    "steps": [
                        {"triggerMask": 511, "params": [70000, -1, 512], "state": 257},
                        {"triggerMask": -1}
                    ]
                }]
            }]
        }"#;
        let doc: ProjectDocument = serde_json::from_str(json).unwrap();
        let (mut seq, _log) = recording_sequencer();
        doc.apply(&mut seq);

        assert_eq!(seq.clock().step_length(), crate::middle::MAX_STEP_LENGTH);
        assert_eq!(seq.clock().swing(), -3);
        let pattern = seq.track(0).pattern(0);
        assert_eq!(pattern.offset(), STEPS_PER_PATTERN);
        assert_eq!(pattern.track_length(), 1);
        let step = pattern.step(0);
        assert_eq!(step.trigger_mask, 0b11_1111);
        assert_eq!(step.param(0), PARAM_MAX);
        assert_eq!(step.param(1), 0);
        assert_eq!(step.param(2), 512);
        assert!(step.is_trigger_on());
        assert!(!step.is_parameter_lock_on());
        assert_eq!(pattern.step(1).trigger_mask, 0b11_1111);
    }
}
