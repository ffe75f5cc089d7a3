//! Terminal output for menus and diagnostics.

use console::{Style, Term};

/// Message tone, mapped to a terminal style.
#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Heading,
    Good,
    Warn,
    Bad,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Heading => Style::new().cyan().bold(),
            Self::Good => Style::new().green(),
            Self::Warn => Style::new().yellow(),
            Self::Bad => Style::new().red(),
        }
    }
}

/// Writes rendered menus to stdout and diagnostics to stderr.
pub(crate) struct Output {
    menus: Term,
    diagnostics: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            menus: Term::stdout(),
            diagnostics: Term::stderr(),
        }
    }

    /// Print a rendered menu.
    pub(crate) fn menu(&self, rendered: &str) {
        let _ = self.menus.write_line(rendered);
    }

    fn message(&self, tone: Tone, msg: &str) {
        let _ = self
            .diagnostics
            .write_line(&tone.style().apply_to(msg).to_string());
    }

    pub(crate) fn note(&self, msg: &str) {
        self.message(Tone::Plain, msg);
    }

    pub(crate) fn heading(&self, msg: &str) {
        self.message(Tone::Heading, msg);
    }

    pub(crate) fn ok(&self, msg: &str) {
        self.message(Tone::Good, msg);
    }

    /// Report a validation problem, naming the field when there is one.
    pub(crate) fn issue(&self, subject: &str, field: Option<&str>, msg: &str) {
        let line = match field {
            Some(field) => format!("{subject} [{field}]: {msg}"),
            None => format!("{subject}: {msg}"),
        };
        self.message(Tone::Warn, &line);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.message(Tone::Bad, msg);
    }
}
