//! What the user sees on stdout: the run report, next steps, and the
//! listings printed by `manifest` and `config`.
//!
//! Status lines carry a glyph and, on a colour terminal, a colour. Listings
//! go through [`OutputManager::data`] so `--quiet` never hides something a
//! script is reading.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;

use crate::cli::global::GlobalArgs;
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Success,
    Warning,
    Info,
}

impl Tone {
    fn glyph(self) -> &'static str {
        match self {
            Tone::Success => "\u{2713}",
            Tone::Warning => "\u{26a0}",
            Tone::Info => "\u{2139}",
        }
    }
}

pub struct OutputManager {
    quiet: bool,
    plain: bool,
    term: Term,
}

impl OutputManager {
    /// Colour is dropped for `--no-color`, `NO_COLOR`, `output.no_color` in
    /// the config file, or when stdout is not a terminal.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let plain = args.no_color || config.output.no_color || !io::stdout().is_terminal();
        Self {
            quiet: args.quiet,
            plain,
            term: Term::stdout(),
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Listing or machine-readable output; written even with `--quiet`.
    pub fn data(&self, line: &str) -> io::Result<()> {
        self.term.write_line(line)
    }

    pub fn print(&self, line: &str) -> io::Result<()> {
        self.chatter(line.to_owned())
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        let line = if self.plain {
            text.to_owned()
        } else {
            text.bold().cyan().to_string()
        };
        self.chatter(line)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.chatter(self.decorate(Tone::Success, msg))
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.chatter(self.decorate(Tone::Warning, msg))
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.chatter(self.decorate(Tone::Info, msg))
    }

    fn decorate(&self, tone: Tone, msg: &str) -> String {
        let glyph = tone.glyph();
        if self.plain {
            return format!("{glyph} {msg}");
        }
        match tone {
            Tone::Success => format!("{} {}", glyph.bold().green(), msg.green()),
            Tone::Warning => format!("{} {}", glyph.bold().yellow(), msg.yellow()),
            Tone::Info => format!("{} {}", glyph.bold().blue(), msg.blue()),
        }
    }

    /// Anything that is not data is dropped under `--quiet`.
    fn chatter(&self, line: String) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(quiet: bool) -> OutputManager {
        let args = GlobalArgs {
            quiet,
            no_color: true,
            ..GlobalArgs::default()
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn plain_status_lines_keep_their_glyph() {
        let out = plain(false);
        assert_eq!(
            out.decorate(Tone::Success, "Project acme created"),
            "\u{2713} Project acme created"
        );
        assert_eq!(out.decorate(Tone::Warning, "exists"), "\u{26a0} exists");
        assert_eq!(
            out.decorate(Tone::Info, "Module: acme/api"),
            "\u{2139} Module: acme/api"
        );
    }

    #[test]
    fn coloured_status_lines_still_carry_the_message() {
        let out = OutputManager {
            quiet: false,
            plain: false,
            term: Term::stdout(),
        };
        let line = out.decorate(Tone::Success, "Project acme created");
        assert!(line.contains("Project acme created"));
        assert_ne!(line, "\u{2713} Project acme created");
    }

    #[test]
    fn quiet_mode_still_writes_data() {
        let out = plain(true);
        assert!(out.is_quiet());
        assert!(out.print("skipped").is_ok());
        assert!(out.data("main.go").is_ok());
    }

    #[test]
    fn config_file_can_turn_colour_off() {
        let mut config = AppConfig::default();
        config.output.no_color = true;
        assert!(OutputManager::new(&GlobalArgs::default(), &config).plain);
    }
}
