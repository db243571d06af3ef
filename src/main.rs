use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;

use anyhow::Context;
use clap::Parser;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use toruslife::DEFAULT_HEIGHT;
use toruslife::DEFAULT_WIDTH;
use toruslife::app::App;
use toruslife::app::Mode;
use toruslife::braille::BrailleSink;
use toruslife::config::Config;
use toruslife::display::PixelBuffer;
use toruslife::engine::RuleEngine;
use toruslife::io::TermEvent;
use toruslife::io::convert_event;
use toruslife::menu::DEFAULT_VIEWPORT;
use toruslife::menu::SelectionMenu;
use toruslife::pattern::PatternLibrary;
use toruslife::rle;
use toruslife::rule_set::RuleSet;
use toruslife::simulation::Simulation;
use toruslife::simulation::Stats;

/// Longest pattern label the menu shows
const LABEL_WIDTH: usize = 18;

/// Conway's Game of Life on a torus
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Rulestring, e.g. B3/S23
    #[arg(short, long, default_value = "B3/S23")]
    rule: RuleSet,

    /// Start this pattern right away instead of showing the menu
    #[arg(short, long)]
    pattern: Option<String>,

    /// Seed for the random patterns
    #[arg(short, long)]
    seed: Option<u64>,

    /// Milliseconds between generations
    #[arg(long, value_name = "MS", default_value_t = 100)]
    frame_ms: u64,

    /// Rows shown by the pattern menu
    #[arg(long, default_value_t = DEFAULT_VIEWPORT)]
    viewport: usize,

    /// Extra pattern in RLE format. May be given more than once.
    #[arg(long, value_name = "FILE")]
    rle: Vec<PathBuf>,

    /// Print stats instead of drawing the grid. Needs --pattern.
    #[arg(long)]
    headless: bool,

    /// Stop after this many generations
    #[arg(short, long)]
    generations: Option<u64>,

    /// List the available patterns and exit
    #[arg(long)]
    list: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            width: cli.width,
            height: cli.height,
            rule: cli.rule,
            viewport: cli.viewport,
            frame_time: Duration::from_millis(cli.frame_ms),
            seed: cli.seed,
            pattern: cli.pattern,
            rle: cli.rle,
            headless: cli.headless,
            generations: cli.generations,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let list = cli.list;

    let config = Config::from(cli);
    config.validate().context("Invalid configuration")?;

    let library = load_library(&config)?;

    if list {
        for pattern in library.iter() {
            println!("{:<24}{}", pattern.name, pattern.label);
        }

        return Ok(());
    }

    // The only place randomness is tied to the clock
    let seed = config.seed.unwrap_or_else(clock_seed);
    info!(seed, "seeding random patterns");
    let mut rng = StdRng::seed_from_u64(seed);

    let menu = SelectionMenu::new(library.names(), config.viewport)
        .context("Failed to build the pattern menu")?;
    let sim = Simulation::new(
        library.clone(),
        RuleEngine::new(config.rule),
        config.width,
        config.height,
    );
    let mut app = App::new(menu, sim);

    if let Some(pattern) = &config.pattern {
        app.launch(pattern, &mut rng)
            .with_context(|| format!("Failed to start pattern \"{pattern}\""))?;
    }

    if config.headless {
        run_headless(&config, &mut app)
    } else {
        run_terminal(&config, &mut app, &library, &mut rng)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Built-in patterns followed by any given as RLE files
fn load_library(config: &Config) -> anyhow::Result<PatternLibrary> {
    let mut library = PatternLibrary::default();

    for path in &config.rle {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to open {}", path.display()))?;

        let fallback = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "rle".to_string());

        let (pattern, header) = rle::read_pattern(&bytes, &fallback)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if header.rule.is_some_and(|r| r != config.rule) {
            warn!(
                pattern = %pattern.name,
                "pattern is meant for a different rule than {}",
                config.rule
            );
        }

        library
            .insert(pattern)
            .with_context(|| format!("Failed to register {}", path.display()))?;
    }

    Ok(library)
}

fn run_headless(config: &Config, app: &mut App) -> anyhow::Result<()> {
    let mut fb = PixelBuffer::new(config.width, config.height);
    let mut stdout = io::stdout().lock();

    loop {
        let stats = app.stats();
        writeln!(stdout, "{stats}")?;

        if config.generations.is_some_and(|n| stats.generation >= n) {
            break;
        }

        app.frame(&mut fb)?;
    }

    if app.simulation().is_extinct() {
        info!("every cell died");
    }

    Ok(())
}

fn run_terminal(
    config: &Config,
    app: &mut App,
    library: &PatternLibrary,
    rng: &mut StdRng,
) -> anyhow::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

    let res = event_loop(config, app, library, rng);

    execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    res
}

/// Fixed-rate deadlines for stepping generations.
#[derive(Debug, Clone, Copy)]
struct FramePacer {
    frame_time: Duration,
    next: Instant,
}

impl FramePacer {
    /// The first frame is due right away
    fn new(frame_time: Duration, now: Instant) -> Self {
        Self {
            frame_time,
            next: now,
        }
    }

    /// How long input may be waited on before the next frame is due
    fn timeout(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Schedule the frame after the one drawn at `now`. A late frame pushes the schedule back
    /// rather than bunching up the frames that follow.
    fn advance(&mut self, now: Instant) {
        self.next = (self.next + self.frame_time).max(now);
    }
}

fn event_loop(
    config: &Config,
    app: &mut App,
    library: &PatternLibrary,
    rng: &mut StdRng,
) -> anyhow::Result<()> {
    let mut sink = BrailleSink::new(config.width, config.height, io::stdout());
    let mut last_mode = None;
    let mut status = String::new();
    let mut pacer = FramePacer::new(config.frame_time, Instant::now());

    loop {
        // Handle input until the next generation is due. Key presses never bring it forward.
        if event::poll(pacer.timeout(Instant::now()))? {
            match convert_event(event::read()?) {
                Some(TermEvent::Exit) => break,
                Some(TermEvent::Input(input)) => match app.handle(input, rng) {
                    Ok(()) => status.clear(),
                    Err(e) => {
                        // stderr would tear the frame, so errors go on the status line
                        debug!("{e}");
                        status = e.to_string();
                    }
                },
                Some(TermEvent::Resize { .. }) => last_mode = None,
                None => {}
            }

            if app.mode() == Mode::Menu {
                draw(&mut sink, app, library, &mut last_mode, &status)?;
            }

            continue;
        }

        pacer.advance(Instant::now());

        if let Some(stats) = draw(&mut sink, app, library, &mut last_mode, &status)? {
            if config.generations.is_some_and(|n| stats.generation + 1 >= n) {
                break;
            }
        }
    }

    Ok(())
}

/// Draw the menu, or draw the current generation and step once. Returns the stats of the drawn
/// generation when running.
fn draw<W: Write>(
    sink: &mut BrailleSink<W>,
    app: &mut App,
    library: &PatternLibrary,
    last_mode: &mut Option<Mode>,
    status: &str,
) -> anyhow::Result<Option<Stats>> {
    if *last_mode != Some(app.mode()) {
        queue!(sink.writer(), terminal::Clear(terminal::ClearType::All))?;
        *last_mode = Some(app.mode());
    }

    queue!(sink.writer(), cursor::MoveTo(0, 0))?;

    let stats = match app.mode() {
        Mode::Menu => {
            draw_menu(sink.writer(), app.menu(), library)?;
            None
        }
        Mode::Running => {
            let stats = app.stats();
            app.frame(sink)?;

            queue!(
                sink.writer(),
                terminal::Clear(terminal::ClearType::CurrentLine),
                style::Print(stats),
                cursor::MoveToNextLine(1),
            )?;

            Some(stats)
        }
    };

    queue!(
        sink.writer(),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(status),
    )?;
    sink.writer().flush()?;

    Ok(stats)
}

fn draw_menu<W: Write>(out: &mut W, menu: &SelectionMenu, library: &PatternLibrary) -> io::Result<()> {
    queue!(
        out,
        style::Print("GAME OF LIFE"),
        cursor::MoveToNextLine(1),
        style::Print("SELECT PATTERN"),
        cursor::MoveToNextLine(2),
    )?;

    for (_, key, selected) in menu.visible() {
        let label = library.get(key).map_or(key, |p| p.label.as_ref());
        let marker = if selected { ">" } else { " " };
        let label: String = label.chars().take(LABEL_WIDTH).collect();

        queue!(
            out,
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(format!("{marker} {label}")),
            cursor::MoveToNextLine(1),
        )?;
    }

    queue!(
        out,
        cursor::MoveToNextLine(1),
        style::Print("space: next  enter: start  q: quit"),
        cursor::MoveToNextLine(1),
    )?;

    Ok(())
}
