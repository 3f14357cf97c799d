mod app;
mod calendar;
mod exam;
mod help;
mod jumpto;
mod logging;
mod table;
mod theme;
use crate::app::App;
use crate::calendar::{write_month, MonthCursor, MonthView};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Id of the element wrapping the exam schedule table on the student portal
static DEFAULT_CONTAINER: &str = "ctl00_mainContent_divContent";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct RunOptions {
    input: Option<PathBuf>,
    container: String,
    date: Option<Date>,
    print: bool,
    verbosity: u8,
}

impl Default for RunOptions {
    fn default() -> RunOptions {
        RunOptions {
            input: None,
            container: String::from(DEFAULT_CONTAINER),
            date: None,
            print: false,
            verbosity: 0,
        }
    }
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("container") => {
                    opts.container = parser.value()?.string()?;
                }
                Arg::Short('d') | Arg::Long("date") => {
                    let value = parser.value()?.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => opts.date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                Arg::Short('p') | Arg::Long("print") => opts.print = true,
                Arg::Short('v') | Arg::Long("verbose") => {
                    opts.verbosity = opts.verbosity.saturating_add(1);
                }
                Arg::Value(value) if opts.input.is_none() => {
                    opts.input = Some(PathBuf::from(value));
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                logging::init(opts.verbosity, !opts.print);
                let html = read_input(opts.input.as_deref())?;
                let events = exam::scrape(&html, &opts.container);
                let Some(mut view) = MonthView::from_events(events) else {
                    return Ok(());
                };
                if let Some(date) = opts.date {
                    view = view.start_at(MonthCursor::containing(date));
                }
                if opts.print {
                    write_month(view.grid(), io::stdout().lock())
                        .context("failed to write calendar")?;
                    return Ok(());
                }
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(view, today).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: examcal [options] [FILE]");
                println!();
                println!("Month calendar of the exams listed in a saved exam-schedule page");
                println!();
                println!("FILE is the saved HTML page; with no FILE, or when FILE is -, the");
                println!("page is read from standard input.");
                println!();
                println!("Options:");
                println!("  -c, --container ID     Id of the element holding the schedule table");
                println!("                         [default: {DEFAULT_CONTAINER}]");
                println!("  -d, --date YYYY-MM-DD  Start on the month containing this date");
                println!("  -p, --print            Print the month as text instead of browsing");
                println!("  -v, --verbose          Log more with --print; repeat for even more");
                println!("  -h, --help             Display this help message and exit");
                println!("  -V, --version          Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        _ => {
            let mut html = String::new();
            io::stdin()
                .read_to_string(&mut html)
                .context("failed to read page from standard input")?;
            Ok(html)
        }
    }
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("examcal").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(RunOptions::default()));
    }

    #[test]
    fn test_all_options() {
        assert_eq!(
            parse(&["-vv", "--container", "exams", "-d", "2024-03-15", "--print", "page.html"])
                .unwrap(),
            Command::Run(RunOptions {
                input: Some(PathBuf::from("page.html")),
                container: String::from("exams"),
                date: Some(date!(2024 - 03 - 15)),
                print: true,
                verbosity: 2,
            })
        );
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(parse(&["page.html", "--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_bad_date() {
        assert!(matches!(
            parse(&["--date", "15/3/2024"]),
            Err(lexopt::Error::ParsingFailed { .. })
        ));
    }

    #[test]
    fn test_extra_positional() {
        assert!(parse(&["a.html", "b.html"]).is_err());
    }
}
