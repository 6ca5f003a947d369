use crate::shared::clip_param;

// raw ADC jitter we ignore before treating a knob as "moved"
pub const DEADBAND: u16 = 8;

/// A potentiometer with an activity latch. The latch goes up when the knob
/// moves past the deadband and only comes down through `deactivate`, which the
/// engine calls whenever the knob's meaning changes.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnalogController {
    published: u16,
    active: bool,
    seeded: bool,
}

impl AnalogController {
    pub fn update(&mut self, raw: u16) {
        let raw = clip_param(raw);
        if !self.seeded {
            // power-up reading is where the knob already is, not a gesture
            self.seeded = true;
            self.published = raw;
            return;
        }
        if raw.abs_diff(self.published) > DEADBAND {
            self.published = raw;
            self.active = true;
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn value(&self) -> u16 {
        self.published
    }
}
