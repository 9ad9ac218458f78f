//! Grove Dash entry point
//!
//! Runs the game loop headless: the scene is recorded into a draw list and
//! sounds go to the log. A windowed frontend plugs its own `Canvas`,
//! `AudioBackend` and input events into the same loop, turning its native
//! key names into events with `Key::from_name` and passing them to
//! `InputState::handle`. With no window there are no key events, so the
//! headless run plays a looping demo script through that same path.

use std::process::ExitCode;

use grove_dash::audio::{AudioManager, LogBackend};
use grove_dash::consts::TICKS_PER_SECOND;
use grove_dash::platform::{FrameClock, InputEvent, InputState, Key};
use grove_dash::renderer::{DrawList, render};
use grove_dash::sim::{GameState, tick};
use grove_dash::{MapError, Settings};

/// Frames the win banner stays up before the run ends
const WIN_HOLD_FRAMES: u32 = 2 * TICKS_PER_SECOND;

/// Length of one pass of the demo script, in frames
const DEMO_PERIOD: u64 = 240;

/// `(frame within period, key name, pressed)`: run right, hop, dash, run back
const DEMO_SCRIPT: &[(u64, &str, bool)] = &[
    (0, "d", true),
    (45, " ", true),
    (46, " ", false),
    (90, "x", true),
    (91, "x", false),
    (150, "d", false),
    (150, "ArrowLeft", true),
    (200, "ArrowUp", true),
    (201, "ArrowUp", false),
    (239, "ArrowLeft", false),
];

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Grove Dash starting...");

    match run(&Settings::load()) {
        Ok(frames) => {
            log::info!("Quit after {frames} frames");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<u64, MapError> {
    let mut session = Session::new(settings)?;
    log::info!(
        "Seed {}, {} level(s), output {}",
        session.state.seed,
        session.state.library.level_count(),
        settings.output_size()
    );

    let mut clock = FrameClock::default();
    while settings.max_frames.is_none_or(|max| session.frames < max) {
        let running = session.frame()?;
        clock.wait();
        if !running {
            break;
        }
    }

    session.audio.shutdown();
    Ok(session.frames)
}

/// Everything one headless run drives each frame
struct Session {
    state: GameState,
    audio: AudioManager<LogBackend>,
    input: InputState,
    canvas: DrawList,
    frames: u64,
    won_frames: u32,
}

impl Session {
    fn new(settings: &Settings) -> Result<Self, MapError> {
        let state = GameState::new(settings)?;
        let mut audio = AudioManager::new(LogBackend::default(), settings);
        audio.start_background();
        Ok(Self {
            state,
            audio,
            input: InputState::new(),
            canvas: DrawList::default(),
            frames: 0,
            won_frames: 0,
        })
    }

    /// Key events the demo script fires on this frame
    fn script_input(&mut self) {
        let beat = self.frames % DEMO_PERIOD;
        for &(at, name, pressed) in DEMO_SCRIPT {
            if at != beat {
                continue;
            }
            if let Some(key) = Key::from_name(name) {
                let event = if pressed {
                    InputEvent::KeyDown(key)
                } else {
                    InputEvent::KeyUp(key)
                };
                self.input.handle(event);
            }
        }
    }

    /// Run one frame. Returns false once the run is over.
    fn frame(&mut self) -> Result<bool, MapError> {
        self.script_input();
        let tick_input = self.input.take_tick_input();
        tick(&mut self.state, &tick_input)?;
        self.audio.play_all(self.state.effects.drain_sounds());

        self.canvas.clear();
        render(&self.state, &mut self.canvas);
        self.frames += 1;

        if self.state.is_won() {
            if self.won_frames == 0 {
                log::info!("You win !");
            }
            self.won_frames += 1;
            if self.won_frames >= WIN_HOLD_FRAMES {
                return Ok(false);
            }
        }
        Ok(!self.input.quit_requested())
    }
}
