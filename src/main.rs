//! Terminal runner for the cascade puzzle (default binary).
//!
//! Each swap is resolved by the engine in one call; the resulting event log is
//! then played back through [`Replay`] at the pace its pause entries ask for.
//! Input is ignored while a replay is running, except quit and skip.

use std::fs::File;
use std::io::BufWriter;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use tile_cascade::cli::{self, Command};
use tile_cascade::core::logging::{close_log_file, init_log_file, set_verbose};
use tile_cascade::core::{log_error, log_info, GameConfig, GameSession, TurnOutcome};
use tile_cascade::input::{map_key, should_quit, Selection, SelectionOutcome};
use tile_cascade::term::{BoardView, FrameBuffer, Replay, Scene, Screen, Viewport};
use tile_cascade::trace::TraceWriter;
use tile_cascade::types::{InputAction, Pos};

const FRAME_MS: u64 = 16;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match cli::parse_args(&args, GameConfig::from_env())? {
        Command::Play(config) => config,
        Command::Help => {
            println!("{}", cli::USAGE);
            return Ok(());
        }
    };

    set_verbose(config.verbose);
    if let Some(path) = &config.log_path {
        init_log_file(path)?;
    }
    let trace = match &config.trace_path {
        Some(path) => Some(TraceWriter::create(path)?),
        None => None,
    };

    let mut screen = Screen::stdout();
    screen.enter()?;

    let result = run(&mut screen, &config, trace);

    // Always try to restore terminal state.
    let _ = screen.exit();
    close_log_file();
    result
}

struct App {
    session: GameSession,
    scene: Scene,
    selection: Selection,
    replay: Option<Replay>,
    animate: bool,
    trace: Option<TraceWriter<BufWriter<File>>>,
}

impl App {
    fn new(config: &GameConfig, trace: Option<TraceWriter<BufWriter<File>>>) -> Self {
        let mut session = GameSession::at_level(config.seed, config.level);
        session.take_events();
        log_info!("Main", "seed {} level {}", config.seed, config.level);
        let scene = Scene::new(session.snapshot());
        Self {
            session,
            scene,
            selection: Selection::new(),
            replay: None,
            animate: config.animate,
            trace,
        }
    }

    fn busy(&self) -> bool {
        self.replay.as_ref().is_some_and(|r| !r.is_done())
    }

    fn handle(&mut self, action: InputAction) -> Result<()> {
        if self.busy() {
            // Any key fast-forwards the running playback.
            if let Some(replay) = self.replay.as_mut() {
                replay.skip(&mut self.scene);
            }
            self.finish_replay();
            return Ok(());
        }

        if self.selection.move_cursor(action) {
            self.sync_cursor();
            return Ok(());
        }

        match action {
            InputAction::Activate => {
                if self.scene.snapshot.complete {
                    return Ok(());
                }
                match self.selection.activate(self.session.board()) {
                    SelectionOutcome::Swap(a, b) => self.swap(a, b)?,
                    SelectionOutcome::Refused => self.scene.banner = Some("CANNOT MOVE THAT"),
                    _ => self.scene.banner = None,
                }
            }
            InputAction::Cancel => self.selection.cancel(),
            InputAction::Restart => {
                self.session.restart_level()?;
                self.reset_scene();
            }
            InputAction::NextLevel => {
                if self.session.is_complete() {
                    self.session.next_level()?;
                    self.reset_scene();
                }
            }
            _ => {}
        }
        self.sync_cursor();
        Ok(())
    }

    fn swap(&mut self, a: Pos, b: Pos) -> Result<()> {
        let outcome = self.session.request_swap(a, b);
        if let Some(trace) = self.trace.as_mut() {
            trace.record(self.session.level().number, a, b, &outcome)?;
        }
        if let TurnOutcome::Aborted(err) = &outcome {
            log_error!("Main", "turn aborted: {}", err);
        }
        self.scene.clear_transient();
        self.replay = Some(Replay::new(outcome.events().to_vec(), self.animate));
        Ok(())
    }

    fn finish_replay(&mut self) {
        self.replay = None;
        self.scene.sync(self.session.snapshot());
    }

    fn reset_scene(&mut self) {
        self.session.take_events();
        self.replay = None;
        self.selection.cancel();
        self.scene = Scene::new(self.session.snapshot());
    }

    fn sync_cursor(&mut self) {
        self.scene.cursor = self.selection.cursor;
        self.scene.selected = self.selection.selected;
    }

    fn tick(&mut self, elapsed_ms: u32) {
        let Some(replay) = self.replay.as_mut() else {
            return;
        };
        replay.advance(elapsed_ms, &mut self.scene);
        if replay.is_done() {
            self.finish_replay();
        }
    }
}

fn run(
    screen: &mut Screen<std::io::Stdout>,
    config: &GameConfig,
    trace: Option<TraceWriter<BufWriter<File>>>,
) -> Result<()> {
    let mut app = App::new(config, trace);
    app.sync_cursor();

    let view = BoardView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let frame = Duration::from_millis(FRAME_MS);
    let mut last_frame = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&app.scene, Viewport::new(w, h), &mut fb);
        screen.present(&mut fb)?;

        let timeout = frame.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = map_key(key) {
                        app.handle(action)?;
                    }
                }
                Event::Resize(_, _) => screen.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_frame.elapsed();
        if elapsed >= frame {
            last_frame = Instant::now();
            app.tick(elapsed.as_millis() as u32);
        }
    }
}
