use crate::shared::{clip_param, NUM_PARAMS};

// all six parameters asserted
pub const DEFAULT_TRIGGER_MASK: u8 = 0b0011_1111;

/// Two independent flags packed the way the LEDs read them:
/// bit0 = trigger on, bit1 = plock recording on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StepState(u8);

impl StepState {
    pub const TRIGGER: u8 = 0b01;
    pub const PLOCK: u8 = 0b10;

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & (Self::TRIGGER | Self::PLOCK))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn trigger(self) -> bool {
        self.0 & Self::TRIGGER != 0
    }

    pub fn plock(self) -> bool {
        self.0 & Self::PLOCK != 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub state: StepState,
    // which parameters this step asserts; persisted, not consulted on playback yet
    pub trigger_mask: u8,
    params: [u16; NUM_PARAMS],
}

impl Default for Step {
    fn default() -> Self {
        Self {
            state: StepState::default(),
            trigger_mask: DEFAULT_TRIGGER_MASK,
            params: [0; NUM_PARAMS],
        }
    }
}

impl Step {
    pub fn is_trigger_on(&self) -> bool {
        self.state.trigger()
    }

    pub fn is_parameter_lock_on(&self) -> bool {
        self.state.plock()
    }

    pub fn toggle_trigger_state(&mut self) {
        self.state = StepState(self.state.0 ^ StepState::TRIGGER);
    }

    pub fn toggle_parameter_lock_record(&mut self) {
        self.state = StepState(self.state.0 ^ StepState::PLOCK);
    }

    pub fn set_parameter_lock_record(&mut self, on: bool) {
        self.state = if on {
            StepState(self.state.0 | StepState::PLOCK)
        } else {
            StepState(self.state.0 & !StepState::PLOCK)
        };
    }

    /// `index` is zero based: parameter1 is `param(0)`.
    pub fn param(&self, index: usize) -> u16 {
        self.params[index % NUM_PARAMS]
    }

    pub fn set_param(&mut self, index: usize, value: u16) {
        self.params[index % NUM_PARAMS] = clip_param(value);
    }

    pub fn params(&self) -> &[u16; NUM_PARAMS] {
        &self.params
    }

    pub fn copy_values_from(&mut self, source: &Step) {
        self.state = source.state;
        self.trigger_mask = source.trigger_mask;
        self.params = source.params;
    }
}
