mod display;

use std::fs::File;
use std::io::{stdout, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use gesture_runner::audio::{Audio, Bell, Silent};
use gesture_runner::config::Config;
use gesture_runner::score_store::{self, HighScoreStore};
use gesture_runner::session::{run_headless, Session, FRAME};
use gesture_runner::source::{DemoSource, KeyboardSource, LandmarkSource, StreamSource};

/// Headless runs stop here unless `--ticks` says otherwise (one minute of play).
const DEFAULT_HEADLESS_TICKS: u64 = 3600;

#[derive(Parser, Debug)]
#[command(name = "gesture_runner", about = "Hand-gesture controlled runner/shooter")]
struct Cli {
    /// RON file overriding game rules and gesture thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Landmark stream, one frame of 42 numbers per line ("-" for stdin)
    #[arg(long)]
    landmarks: Option<String>,

    /// Let a random player drive the game
    #[arg(long, conflicts_with = "landmarks")]
    demo: bool,

    /// Seed for --demo
    #[arg(long, requires = "demo")]
    seed: Option<u64>,

    /// Pose with keys instead of a hand (the default without --landmarks or --demo)
    #[arg(long, conflicts_with_all = ["landmarks", "demo"])]
    keyboard: bool,

    /// High score file (default: $HOME/.gesture_runner_score)
    #[arg(long)]
    score_file: Option<PathBuf>,

    /// Run without a terminal UI on a simulated 60 Hz clock
    #[arg(long)]
    headless: bool,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,

    /// Write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Setup helpers ────────────────────────────────────────────────────────────

fn init_logging(log_file: Option<&Path>, headless: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "gesture_runner=info".into());
    // Anything printed to the terminal would tear the UI, so without a log
    // file only headless runs log.
    let writer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("when creating log file at {:?}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None if headless => BoxMakeWriter::new(std::io::stderr),
        None => BoxMakeWriter::new(std::io::sink),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(log_file.is_none())
        .with_writer(writer)
        .init();
    Ok(())
}

fn open_source(cli: &Cli) -> anyhow::Result<Box<dyn LandmarkSource>> {
    if let Some(path) = &cli.landmarks {
        info!(source = %path, "reading landmark stream");
        if path == "-" {
            return Ok(Box::new(StreamSource::new(std::io::stdin().lock())));
        }
        let file = File::open(path)
            .with_context(|| format!("when opening landmark stream at {:?}", path))?;
        return Ok(Box::new(StreamSource::new(BufReader::new(file))));
    }
    if cli.demo {
        let rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(seed = ?cli.seed, "demo player");
        return Ok(Box::new(DemoSource::new(rng)));
    }
    if cli.headless {
        warn!("headless run with keyboard input: nothing will happen");
    }
    info!(explicit = cli.keyboard, "keyboard poses");
    Ok(Box::new(KeyboardSource::new()))
}

// ── Loops ────────────────────────────────────────────────────────────────────

/// Returns when the player quits or the tick limit is reached.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    source: &mut dyn LandmarkSource,
    hint: &str,
    ticks: Option<u64>,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut tick: u64 = 0;

    loop {
        let frame_start = Instant::now();
        tick += 1;
        if ticks.is_some_and(|limit| tick > limit) {
            return Ok(());
        }

        // ── Drain pending input without blocking ─────────────────────────────
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                let KeyEvent { code, kind, modifiers, .. } = key;
                if kind == KeyEventKind::Press {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        _ => {}
                    }
                }
                source.on_key(key);
            }
        }

        session.tick(source, started.elapsed());

        let (width, height) = terminal::size()?;
        let view = display::Viewport::new(width, height, &session.state);
        let tracker = display::Tracker {
            hand: session.last_hand(),
            intent: session.last_intent(),
        };
        display::render(out, &session.state, &view, &tracker, hint)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

fn run_terminal(cli: &Cli, session: &mut Session, source: &mut dyn LandmarkSource) -> anyhow::Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for key-release events; terminals without the kitty protocol refuse
    // and the keyboard source falls back to its hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

    let hint = if cli.landmarks.is_some() || cli.demo {
        "Q : Quit"
    } else {
        "F ✊ start  V ✌️ smg  H 🤘 cannon  P 🤏 monster gun  S 🤙 reboot  Q quit"
    };
    let result = game_loop(&mut out, session, source, hint, cli.ticks);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.headless)?;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let store = HighScoreStore::new(cli.score_file.clone().unwrap_or_else(score_store::default_path));
    let mut source = open_source(&cli)?;
    let audio: Box<dyn Audio> = if cli.mute || cli.headless {
        Box::new(Silent)
    } else {
        Box::new(Bell::new(stdout()))
    };

    let mut session = Session::new(config, store, audio);
    info!(
        high_score = session.state.high_score,
        path = ?session.store().path(),
        "gesture_runner v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let result = if cli.headless {
        run_headless(&mut session, source.as_mut(), cli.ticks.unwrap_or(DEFAULT_HEADLESS_TICKS));
        Ok(())
    } else {
        run_terminal(&cli, &mut session, source.as_mut())
    };

    // Persist on the way out even if the loop failed.
    session.finish();
    result
}
