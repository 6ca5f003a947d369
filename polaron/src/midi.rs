// MIDI clock in from a system port. Clock pulses go straight to the engine's
// pulse flag from midir's callback thread; transport bytes are queued for the
// engine loop.
use anyhow::{anyhow, Context};
use crossbeam_channel::{Receiver, Sender};
use log::info;
use midir::{Ignore, MidiInput, MidiInputConnection};

use crate::middle::{PulseFlag, MIDI_CLOCK};

pub struct MidiClockInput {
    // dropping the connection closes the port
    _connection: MidiInputConnection<()>,
}

impl MidiClockInput {
    /// Connects to the first input port whose name contains `port_filter`.
    pub fn connect(port_filter: &str, pulse: PulseFlag, bytes: Sender<u8>) -> anyhow::Result<Self> {
        let mut midi_in = MidiInput::new("polaron").context("opening MIDI input")?;
        // clock bytes are what we are here for
        midi_in.ignore(Ignore::None);

        let ports = midi_in.ports();
        let port = ports
            .iter()
            .find(|p| midi_in.port_name(p).is_ok_and(|n| n.contains(port_filter)))
            .ok_or_else(|| anyhow!("no MIDI input port matching {port_filter:?}"))?;
        let port_name = midi_in.port_name(port).unwrap_or_default();

        let connection = midi_in
            .connect(
                port,
                "polaron-clock",
                move |_stamp, message, _| forward(message, &pulse, &bytes),
                (),
            )
            .map_err(|e| anyhow!("connecting to {port_name}: {e}"))?;

        info!("MIDI input connected: {port_name}");
        Ok(Self { _connection: connection })
    }
}

pub fn available_ports() -> Vec<String> {
    match MidiInput::new("polaron scanner") {
        Ok(midi_in) => midi_in
            .ports()
            .iter()
            .filter_map(|p| midi_in.port_name(p).ok())
            .collect(),
        Err(_) => vec![],
    }
}

fn forward(message: &[u8], pulse: &PulseFlag, bytes: &Sender<u8>) {
    for &byte in message {
        if byte == MIDI_CLOCK {
            pulse.raise();
        } else if byte >= 0xF8 {
            // real-time only; the engine ignores anything else anyway
            let _ = bytes.try_send(byte);
        }
    }
}

/// Everything queued since the last call.
pub fn drain(bytes: &Receiver<u8>) -> impl Iterator<Item = u8> + '_ {
    bytes.try_iter()
}
