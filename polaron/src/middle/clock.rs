use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const MIN_STEP_LENGTH: u32 = 32;
pub const MAX_STEP_LENGTH: u32 = 512;
pub const DEFAULT_STEP_LENGTH: u32 = 125;

// 24 PPQN from the wire, we step on 16ths
pub const PULSES_PER_STEP: u8 = 6;

/// Set by whoever receives MIDI clock bytes, cleared by the engine loop.
/// Exactly one writer and one reader.
#[derive(Clone, Debug, Default)]
pub struct PulseFlag(Arc<AtomicBool>);

impl PulseFlag {
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// Decides when the sequencer advances: either every `step_length` ms on the
/// internal clock, or every sixth MIDI clock pulse while syncing.
#[derive(Debug)]
pub struct Clock {
    step_length: u32,
    next_step_time: u64,
    last_step_time: u64,
    pulse_count: u8,
    syncing: bool,
    pulse: PulseFlag,
    // persisted with the project, not applied to timing
    swing: i32,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            step_length: DEFAULT_STEP_LENGTH,
            next_step_time: 0,
            last_step_time: 0,
            pulse_count: 0,
            syncing: false,
            pulse: PulseFlag::default(),
            swing: 0,
        }
    }
}

impl Clock {
    pub fn step_length(&self) -> u32 {
        self.step_length
    }

    pub fn set_step_length(&mut self, ms: u32) {
        self.step_length = ms.clamp(MIN_STEP_LENGTH, MAX_STEP_LENGTH);
    }

    /// Knob 0..1023 onto 512..32 ms, keeping the step grid anchored on the
    /// last step that fired.
    pub fn set_step_length_from_raw(&mut self, raw: u16) {
        let raw = raw.min(1024) as u32;
        self.set_step_length(MAX_STEP_LENGTH - raw * (MAX_STEP_LENGTH - MIN_STEP_LENGTH) / 1024);
        self.next_step_time = self.last_step_time + self.step_length as u64;
    }

    pub fn swing(&self) -> i32 {
        self.swing
    }

    pub fn set_swing(&mut self, swing: i32) {
        self.swing = swing;
    }

    pub fn start(&mut self, now: u64) {
        self.last_step_time = now;
        self.next_step_time = now + self.step_length as u64;
        self.pulse_count = 0;
        // pulses that arrived while stopped don't count towards the first step
        self.pulse.take();
    }

    pub fn stop(&mut self) {
        self.pulse_count = 0;
    }

    pub fn enter_sync(&mut self) {
        self.syncing = true;
    }

    pub fn leave_sync(&mut self) {
        self.syncing = false;
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    pub fn pulse_flag(&self) -> PulseFlag {
        self.pulse.clone()
    }

    pub fn raise_pulse(&self) {
        self.pulse.raise();
    }

    pub fn should_step(&mut self, now: u64) -> bool {
        if self.syncing {
            self.pulse.take() && self.count_pulse()
        } else {
            self.should_step_internal(now)
        }
    }

    fn count_pulse(&mut self) -> bool {
        self.pulse_count += 1;
        if self.pulse_count >= PULSES_PER_STEP {
            self.pulse_count = 0;
            true
        } else {
            false
        }
    }

    fn should_step_internal(&mut self, now: u64) -> bool {
        if now >= self.next_step_time {
            self.last_step_time = self.next_step_time;
            self.next_step_time += self.step_length as u64;
            true
        } else {
            false
        }
    }
}
