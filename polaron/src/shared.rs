// The front panel, as the engine sees it:
//
// Function buttons (one row above the grid, each with an LED):
//   START/STOP    //  rose -> toggle transport
//   PLOCK         //  held: arm plock recording on tracks/steps, tap: cancel all plocks
//   MUTE          //  held: arm mutes on tracks, release: commit them
//   LENGTH        //  held: steps set track length, knobs set tempo / rotation
//   PATTERN       //  held: steps pick or copy patterns, tracks arm pattern ops
//   SET 1/2/3     //  rose -> knobs edit parameter pair (1,2), (3,4) or (5,6)
//
// Track buttons (6, one per instrument voice), step buttons (16), two knobs.
//
// The hardware shims (shift-register scan, debouncing, ADC reads, LED strip) are
// not ours; every tick they hand the engine one `PanelState` and show whatever
// `LedFrame` the engine rendered.

pub const NUM_TRACKS: usize = 6;
pub const NUM_PATTERNS: usize = 16;
pub const STEPS_PER_PATTERN: usize = 16;
pub const NUM_PARAMS: usize = 6;
pub const NUM_FUNCTION_BUTTONS: usize = 8;
pub const PROJECT_SLOTS: usize = 16;

// native ADC range, every parameter lives in 0..=PARAM_MAX
pub const PARAM_MAX: u16 = 1023;

#[inline]
pub fn clip_param(value: u16) -> u16 {
    value.min(PARAM_MAX)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionButton {
    StartStop,
    TogglePlock,
    ToggleMute,
    SetTrackLength,
    SetPattern,
    SetParamSet1,
    SetParamSet2,
    SetParamSet3,
}

impl FunctionButton {
    pub const ALL: [FunctionButton; NUM_FUNCTION_BUTTONS] = [
        FunctionButton::StartStop,
        FunctionButton::TogglePlock,
        FunctionButton::ToggleMute,
        FunctionButton::SetTrackLength,
        FunctionButton::SetPattern,
        FunctionButton::SetParamSet1,
        FunctionButton::SetParamSet2,
        FunctionButton::SetParamSet3,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            FunctionButton::StartStop => "PLAY",
            FunctionButton::TogglePlock => "PLOCK",
            FunctionButton::ToggleMute => "MUTE",
            FunctionButton::SetTrackLength => "LENGTH",
            FunctionButton::SetPattern => "PATTERN",
            FunctionButton::SetParamSet1 => "SET 1",
            FunctionButton::SetParamSet2 => "SET 2",
            FunctionButton::SetParamSet3 => "SET 3",
        }
    }
}

/// One raw scan of the front panel: which buttons are physically down right
/// now and the two knob readings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelState {
    pub function: [bool; NUM_FUNCTION_BUTTONS],
    pub tracks: [bool; NUM_TRACKS],
    pub steps: [bool; STEPS_PER_PATTERN],
    pub knobs: [u16; 2],
}

impl PanelState {
    pub fn with_function(mut self, button: FunctionButton, down: bool) -> Self {
        self.function[button.index()] = down;
        self
    }

    pub fn with_track(mut self, track: usize, down: bool) -> Self {
        self.tracks[track] = down;
        self
    }

    pub fn with_step(mut self, step: usize, down: bool) -> Self {
        self.steps[step] = down;
        self
    }

    pub fn with_knobs(mut self, knob1: u16, knob2: u16) -> Self {
        self.knobs = [knob1, knob2];
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    pub const RED: Rgb = Rgb::new(0xFF, 0x00, 0x00);
    pub const GREEN: Rgb = Rgb::new(0x00, 0x80, 0x00);
    pub const YELLOW: Rgb = Rgb::new(0xFF, 0xFF, 0x00);
    pub const DARK_ORANGE: Rgb = Rgb::new(0xFF, 0x8C, 0x00);
    pub const CORNFLOWER_BLUE: Rgb = Rgb::new(0x64, 0x95, 0xED);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    // same rounding as FastLED's scale8 with the "fixed" variant: 255 keeps the colour as is
    pub fn nscale8(self, scale: u8) -> Self {
        let s = |c: u8| ((c as u16 * (scale as u16 + 1)) >> 8) as u8;
        Self {
            r: s(self.r),
            g: s(self.g),
            b: s(self.b),
        }
    }

    pub fn is_off(self) -> bool {
        self == Rgb::BLACK
    }
}

/// Full LED image written by the engine every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedFrame {
    pub function: [Rgb; NUM_FUNCTION_BUTTONS],
    pub tracks: [Rgb; NUM_TRACKS],
    pub steps: [Rgb; STEPS_PER_PATTERN],
}

impl LedFrame {
    pub fn clear(&mut self) {
        *self = LedFrame::default();
    }

    pub fn function_mut(&mut self, button: FunctionButton) -> &mut Rgb {
        &mut self.function[button.index()]
    }

    pub fn function(&self, button: FunctionButton) -> Rgb {
        self.function[button.index()]
    }
}
