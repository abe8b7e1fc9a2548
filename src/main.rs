use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use scorelog::{
    app::App,
    config::{Config, ConfigStore, FileConfigStore},
    filter::RecencyAnchor,
    pipeline::{self, ChartKind},
    report::write_report,
    runtime::{ChartEvent, Runner},
    ui::ui,
};
use std::{
    error::Error,
    io::{self, stdin, stdout},
    path::PathBuf,
    process,
    time::Duration,
};

const TICK_RATE_MS: u64 = 250;

/// Widest time bucket accepted on the command line, about a century
const MAX_BUCKET_DAYS: i64 = 36_500;

/// chart accuracy and difficulty trends from rhythm game score logs
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Reads one or two rhythm game score logs (Timestamp, Score, Grade, Difficulty Level) and charts accuracy by difficulty, accuracy over time, or difficulty over time, one line per player."
)]
pub struct Cli {
    /// score log csv files, one per player; the file name is the player name
    #[clap(required = true, num_args = 1..=2, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// chart to draw
    #[clap(short = 'c', long, value_enum)]
    chart: Option<ChartKind>,

    /// only use sessions from the last month
    #[clap(long)]
    last_month: bool,

    /// only use sessions from the last N months
    #[clap(short = 'm', long, conflicts_with = "last_month")]
    months: Option<u32>,

    /// use every session, whatever window the stored defaults name
    #[clap(long, conflicts_with_all = ["last_month", "months"])]
    all_time: bool,

    /// measure the time window back from now or from the newest session in the logs
    #[clap(long, value_enum)]
    anchor: Option<RecencyAnchor>,

    /// leave failing (grade E) attempts out of the averages and highlight them (default)
    #[clap(long, overrides_with = "include_fails")]
    no_fail: bool,

    /// average failing (grade E) attempts in with the rest
    #[clap(long, overrides_with = "no_fail")]
    include_fails: bool,

    /// width of a time bucket in days
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..=MAX_BUCKET_DAYS))]
    bucket_days: Option<u32>,

    /// one line per player (default)
    #[clap(long, overrides_with = "no_split")]
    split: bool,

    /// average all players together instead of one line per player
    #[clap(long, overrides_with = "split")]
    no_split: bool,

    /// only accept timestamps in the export format (YYYY-MM-DD hh:mm AM/PM)
    #[clap(long, overrides_with = "lenient_timestamps")]
    strict_timestamps: bool,

    /// accept any common timestamp layout (default)
    #[clap(long, overrides_with = "strict_timestamps")]
    lenient_timestamps: bool,

    /// print a text report instead of the interactive chart
    #[clap(long)]
    print: bool,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

/// Resolve an on/off flag pair against the stored value
fn toggle(on: bool, off: bool, stored: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => stored,
    }
}

impl Cli {
    /// Command line flags layered over the stored defaults
    fn settings(&self, stored: Config) -> Config {
        let months = if self.all_time {
            None
        } else if self.last_month {
            Some(1)
        } else {
            self.months.or(stored.months)
        };
        Config {
            chart: self.chart.unwrap_or(stored.chart),
            months,
            anchor: self.anchor.unwrap_or(stored.anchor),
            exclude_failing: toggle(self.no_fail, self.include_fails, stored.exclude_failing),
            bucket_days: self.bucket_days.unwrap_or(stored.bucket_days),
            split_by_player: toggle(self.split, self.no_split, stored.split_by_player),
            strict_timestamps: toggle(
                self.strict_timestamps,
                self.lenient_timestamps,
                stored.strict_timestamps,
            ),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let store = FileConfigStore::new();
    let settings = cli.settings(store.load());
    log::debug!("effective settings: {settings:?}");

    if cli.save_config {
        store.save(&settings)?;
        eprintln!("saved defaults to {}", store.path().display());
    }

    let app = match build_app(&cli.files, &settings) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("scorelog: {e}");
            process::exit(1);
        }
    };

    if cli.print || !stdout().is_tty() || !stdin().is_tty() {
        let mut out = stdout().lock();
        write_report(&mut out, &app)?;
        return Ok(());
    }

    run_viewer(app)
}

fn build_app(files: &[PathBuf], settings: &Config) -> scorelog::Result<App> {
    let records = pipeline::load_records(files, &settings.timestamp_format())?;
    let config = settings.pipeline_config();
    let now = chrono::Local::now().naive_local();
    let output = pipeline::run(records, &config, now);
    Ok(App::new(settings.chart, &config, output))
}

fn run_viewer(mut app: App) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::from_terminal(Duration::from_millis(TICK_RATE_MS));

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            ChartEvent::Tick => {}
            ChartEvent::Closed => break,
            ChartEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            ChartEvent::Key(key) => {
                if !app.on_key(key) {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}
