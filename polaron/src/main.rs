use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::terminal;
use log::{info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use polaron::audio::{LevelMixer, ParamVoice};
use polaron::audio_api::{Voice, VoiceBank};
use polaron::config::{self, Config};
use polaron::middle::Sequencer;
use polaron::midi::{self, MidiClockInput};
use polaron::pipeline::{DirStore, ProjectPersistence};
use polaron::shared::NUM_TRACKS;
use polaron::tui::mode::{HostCommand, TuiState};
use polaron::tui::view::PanelView;
use polaron::{trace, tui};

const VOICE_NAMES: [&str; NUM_TRACKS] = ["kick", "snare", "hat", "tom", "fm", "noise"];

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config_path: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILE));
    let config = Config::read(&config_path)?;
    trace::setup(&config.log_file, &config.log_filter)?;

    let voices: [Box<dyn Voice>; NUM_TRACKS] =
        std::array::from_fn(|i| Box::new(ParamVoice::new(VOICE_NAMES[i])) as Box<dyn Voice>);
    let bank = VoiceBank::new(
        voices,
        Box::new(LevelMixer::new("L")),
        Box::new(LevelMixer::new("R")),
    );
    let mut seq = Sequencer::new(bank);

    // remember the previous session
    let mut persistence = ProjectPersistence::new(DirStore::new(&config.project_dir));
    if persistence.exists(config.project_slot) {
        let _ = persistence.load(config.project_slot, &mut seq);
    }

    let (midi_tx, midi_rx) = crossbeam_channel::bounded::<u8>(256);
    let _midi = config.midi_port.as_deref().and_then(|filter| {
        MidiClockInput::connect(filter, seq.midi_pulse_flag(), midi_tx.clone())
            .inspect_err(|e| warn!("{e:#}; available: {:?}", midi::available_ports()))
            .ok()
    });

    terminal::enable_raw_mode()?;
    // real press/release detection where the terminal can do it, toggles otherwise
    let release_reported = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if release_reported {
        crossterm::execute!(
            std::io::stdout(),
            crossterm::event::PushKeyboardEnhancementFlags(
                crossterm::event::KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }
    let _guard = RawModeGuard; // auto drops when out of scope

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend).context("setting up terminal")?;
    term.clear()?;

    let tick = Duration::from_micros(config.tick_micros.max(100));
    let frame_rate = Duration::from_millis(16); // ~60fps
    let started = Instant::now();
    let mut last_frame: Option<Instant> = None;
    let mut message = String::new();
    let mut tui_state = TuiState::new(release_reported, config.project_slot);
    info!("host running, tick {:?}, key releases {}", tick, release_reported);

    loop {
        for command in tui::input::poll_input(tick, &mut tui_state, config.knob_step)? {
            match command {
                HostCommand::Quit => {
                    // save before quitting
                    if let Err(e) = persistence.save(tui_state.slot, &seq) {
                        warn!("saving on quit: {e}");
                    }
                    drop(term);
                    return Ok(());
                }
                HostCommand::Save => {
                    message = match persistence.save(tui_state.slot, &seq) {
                        Ok(()) => format!("saved slot {}", tui_state.slot),
                        Err(e) => format!("save failed: {e}"),
                    };
                }
                HostCommand::Load => {
                    message = match persistence.load(tui_state.slot, &mut seq) {
                        Ok(()) => format!("loaded slot {}", tui_state.slot),
                        Err(e) => format!("load failed: {e}"),
                    };
                }
            }
        }

        for byte in midi::drain(&midi_rx) {
            seq.on_midi_input(byte);
        }

        let now = started.elapsed().as_millis() as u64;
        seq.update_state(&tui_state.scan(), now);

        if last_frame.is_none_or(|t| t.elapsed() >= frame_rate) {
            let mut view =
                PanelView::capture(&seq, tui_state.slot, persistence.existing(), persistence.active());
            view.message.clone_from(&message);
            term.draw(|frame| {
                let area = frame.area();
                tui::view::render(frame, area, &view);
            })?;
            last_frame = Some(Instant::now());
        }
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::PopKeyboardEnhancementFlags
        );
        let _ = terminal::disable_raw_mode();
    }
}
