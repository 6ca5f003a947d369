// Terminal stand-in for the front panel: keys in, LEDs out.
pub mod grid;
pub mod input;
pub mod mode;
pub mod view;
