use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use rackr::app::{App, Field};
use rackr::config::Config;
use rackr::engine::dictionary::{self, Dictionary};
use rackr::engine::rack::{self, InputValidation};
use rackr::engine::scoring;
use rackr::engine::search::{SearchRequest, SearchResponse, run_search};
use rackr::event::{AppEvent, EventHandler};
use rackr::session::worker::SearchWorker;
use rackr::store::json_store::{self, JsonStore};
use rackr::ui::components::results_list::ResultsList;
use rackr::ui::components::text_field::TextField;
use rackr::ui::layout::{AppLayout, pack_hint_lines};
use rackr::ui::theme::Theme;

const LOG_ENV: &str = "RACKR_LOG";
const LOG_FILE: &str = "rackr.log";

#[derive(Parser)]
#[command(name = "rackr", version, about = "Find the best-scoring words for a letter rack")]
struct Cli {
    #[arg(short, long, help = "Search once for this rack and print the results")]
    rack: Option<String>,

    #[arg(short, long, requires = "rack", help = "Only words starting with these letters")]
    starts_with: Option<String>,

    #[arg(short, long, requires = "rack", help = "Only words ending with these letters")]
    ends_with: Option<String>,

    #[arg(long, requires = "rack", help = "Print the response as JSON")]
    json: bool,

    #[arg(short, long, help = "Newline-separated word list to search")]
    words: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Milliseconds to wait after typing before searching")]
    debounce_ms: Option<u64>,

    #[arg(long, help = "Log filter, e.g. debug or rackr=trace (overrides RACKR_LOG)")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let one_shot = cli.rack.is_some();

    if let Err(err) = init_logging(cli.log_level.as_deref(), one_shot) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let result = if one_shot { run_once(&cli) } else { run_interactive(&cli) };
    match result {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// One-shot mode logs to stderr; the interactive UI owns the terminal, so it
/// logs to a file in the data directory.
fn init_logging(level: Option<&str>, to_stderr: bool) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if to_stderr {
        builder.with_writer(io::stderr).init();
    } else {
        let dir = json_store::data_dir();
        fs::create_dir_all(&dir)?;
        let path = dir.join(LOG_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Config {
    let mut config = Config::load().unwrap_or_else(|err| {
        warn!(%err, "ignoring unreadable config");
        Config::default()
    });
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        config.debounce_ms = debounce_ms;
    }
    if let Some(words) = &cli.words {
        config.word_list = Some(words.clone());
    }
    config.validate();
    config
}

fn load_dictionary(config: &Config) -> Result<Arc<Dictionary>> {
    match &config.word_list {
        Some(path) => Ok(dictionary::install(Dictionary::load_file(path)?)?),
        None => Ok(dictionary::shared()),
    }
}

fn run_once(cli: &Cli) -> Result<ExitCode> {
    let pattern = cli.rack.clone().unwrap_or_default();
    if let InputValidation::Invalid { reason } = rack::validate(&pattern) {
        eprintln!("{reason}");
        return Ok(ExitCode::from(2));
    }

    let config = load_config(cli);
    let dictionary = load_dictionary(&config)?;
    let request = SearchRequest {
        pattern: pattern.trim().to_string(),
        search_id: 1,
        starts_with: cli.starts_with.clone(),
        ends_with: cli.ends_with.clone(),
    };
    let response = run_search(&dictionary, &request);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }
    Ok(if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_response(response: &SearchResponse) {
    if let Some(err) = &response.error {
        eprintln!("Error: {err}");
        return;
    }
    if response.results.is_empty() {
        println!("No matches found.");
        return;
    }
    println!("{} ({:.1}ms)", response.summary(), response.elapsed_ms);
    let width = response
        .results
        .iter()
        .map(|w| w.word.chars().count())
        .max()
        .unwrap_or(0);
    for (i, entry) in response.results.iter().enumerate() {
        println!(
            "{:>4}  {:<width$}  {:>3} pts  ({})",
            i + 1,
            entry.word,
            entry.score,
            scoring::breakdown(&entry.word)
        );
    }
}

fn run_interactive(cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli);
    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(
            theme = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });
    let dictionary = load_dictionary(&config)?;
    let store = JsonStore::new()
        .inspect_err(|err| warn!(%err, "last query will not be remembered"))
        .ok();
    let tick_rate = config.tick_rate();
    let mut app = App::new(config, theme, SearchWorker::new(dictionary), store);

    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(tick_rate);
    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.save_last_query();
    result.map(|_| ExitCode::SUCCESS)
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Worker threads catch their own panics; anything here is on the UI thread.
        error!("{info}");
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| render(frame, app))?;
        }

        dirty = match events.next()? {
            AppEvent::Key(key) => {
                app.handle_key(key, Instant::now());
                true
            }
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => true,
        };

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

    let layout = AppLayout::new(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " rackr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " word finder for letter racks",
            Style::default().fg(colors.text_muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let message = app.validation_message();
    for (field, rect) in [
        (Field::Rack, layout.rack),
        (Field::StartsWith, layout.starts_with),
        (Field::EndsWith, layout.ends_with),
    ] {
        let widget = TextField::new(field.label(), app.input(field), &app.theme)
            .placeholder(field.placeholder())
            .focused(app.focus == field)
            .invalid(field == Field::Rack && message.is_some());
        frame.render_widget(widget, rect);
    }

    if let Some(message) = message {
        let line = Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(colors.warning()),
        ));
        frame.render_widget(Paragraph::new(line), layout.message);
    }

    let results = ResultsList::new(app.search.response(), app.search.is_searching(), &app.theme)
        .scroll(app.scroll)
        .show_breakdown(layout.tier.show_breakdown());
    frame.render_widget(results, layout.results);

    let hints = [
        "[Tab] Next field",
        "[Ctrl-U] Clear",
        "[Up/Down] Scroll",
        "[Esc] Quit",
    ];
    if let Some(hint) = pack_hint_lines(&hints, layout.footer.width as usize).into_iter().next() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                hint,
                Style::default().fg(colors.text_muted()),
            ))),
            layout.footer,
        );
    }
}
