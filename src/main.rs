use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, terminal,
};
use flappy_rect::input::{self, Command};
use flappy_rect::render::{self, PixelBuf};
use flappy_rect::sound::{Cue, Sfx};
use flappy_rect::{GameEvent, Session, Settings, config, storage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::{self, OpenOptions};
use std::io::{self, Stdout, Write, stdout};
use std::path::Path;
use std::time::{Duration, Instant};

/// How long to wait for input when no timer is armed.
const IDLE_WAIT: Duration = Duration::from_millis(250);

const LOG_FILE: &str = "flappy-rect.log";

/// Log to a file in the data directory; stderr is the screen we draw on.
fn init_logging(dir: Option<&Path>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(dir) = dir {
        let file = fs::create_dir_all(dir).and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE))
        });
        if let Ok(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    builder.init();
}

fn play(sfx: Option<&Sfx>, event: GameEvent) {
    let (Some(sfx), Some(cue)) = (sfx, Cue::for_event(event)) else {
        return;
    };
    if let Err(e) = sfx.play(cue) {
        log::warn!("Sound cue {:?} failed: {}", cue, e);
    }
}

fn run(out: &mut Stdout, session: &mut Session, sfx: Option<&Sfx>) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);

    loop {
        // Input, waiting no longer than the next timer
        let timeout = session
            .next_deadline()
            .map(|d| d.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_WAIT);
        if event::poll(timeout)? {
            loop {
                match input::translate(&event::read()?) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Signal(signal)) => session.push_signal(signal),
                    Some(Command::Resize(c, r)) => {
                        buf.resize(c as usize, r as usize * 2);
                        session.resize(input::surface_for(c, r));
                        execute!(out, terminal::Clear(terminal::ClearType::All))?;
                    }
                    None => {}
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        // Update
        let stepped = session.pump(Instant::now());
        for ev in session.take_events() {
            if let GameEvent::Crashed { score, new_best } = ev {
                log::info!("Run ended at {} (new best: {})", score, new_best);
            }
            play(sfx, ev);
        }

        // Render
        if stepped || session.take_redraw() {
            render::draw(session, &mut buf);
            buf.render(out)?;
        }
    }
}

fn main() -> io::Result<()> {
    let dir = config::data_dir();
    init_logging(dir.as_deref());
    let settings = dir.as_deref().map(Settings::load).unwrap_or_default();
    log::info!("Starting with {:?}", settings);

    let sfx = if settings.sound {
        Sfx::open()
            .inspect_err(|e| log::warn!("Sound disabled: {}", e))
            .ok()
    } else {
        None
    };

    let (cols, rows) = terminal::size()?;
    let mut session = Session::new(
        input::surface_for(cols, rows),
        settings.frame_period(),
        storage::open(dir.as_deref()),
        StdRng::from_entropy(),
        Instant::now(),
    );

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let result = run(&mut out, &mut session, sfx.as_ref());

    execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()?;
    out.flush()?;

    if result.is_ok() {
        println!("Best score: {}", session.best_score());
    }
    result
}
