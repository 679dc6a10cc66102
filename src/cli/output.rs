//! Colored terminal output for both binaries.
//!
//! Status lines go to stdout, warnings and errors to stderr. Color is only
//! used when the stream is a terminal.

use std::io::{IsTerminal, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Prefix of the single line printed for warnings and fatal errors.
pub const WARNING_PREFIX: &str = "warning:";

/// User-facing output with verbosity control.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Create an output manager.
    ///
    /// `quiet` suppresses everything except warnings and errors; `verbose`
    /// additionally enables [`OutputManager::verbose`] lines.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Plain informational line.
    pub fn info(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = stdout();
        writeln!(stdout, "{message}")
    }

    /// Detail shown only in verbose mode.
    pub fn verbose(&self, message: &str) -> std::io::Result<()> {
        if !self.is_verbose() {
            return Ok(());
        }
        let mut stdout = stdout();
        stdout.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(stdout, "{message}")?;
        stdout.reset()
    }

    /// Stage banner, e.g. "Downloading relkit-linux-amd64.tar.gz".
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = stdout();
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        writeln!(stdout, "→ {message}")?;
        stdout.reset()
    }

    /// Completed step.
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = stdout();
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(stdout, "✓ {message}")?;
        stdout.reset()
    }

    /// Bold section header followed by a blank line.
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = stdout();
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        writeln!(stdout, "{title}")?;
        stdout.reset()?;
        writeln!(stdout)
    }

    /// Indented detail line, used for summaries.
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = stdout();
        writeln!(stdout, "   {message}")
    }

    /// One `warning: <message>` line on stderr. Never suppressed.
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        let mut stderr = stderr();
        stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        write!(stderr, "{WARNING_PREFIX}")?;
        stderr.reset()?;
        writeln!(stderr, " {message}")
    }

    /// Fatal error report. Uses the same single-line format as warnings.
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.warn(message)
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new(false, false)
    }
}

fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice(std::io::stdout().is_terminal()))
}

fn stderr() -> StandardStream {
    StandardStream::stderr(color_choice(std::io::stderr().is_terminal()))
}

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_only_on_terminals() {
        assert_eq!(color_choice(false), ColorChoice::Never);
        assert_eq!(color_choice(true), ColorChoice::Auto);
    }

    #[test]
    fn quiet_overrides_verbose() {
        assert!(OutputManager::new(true, false).is_verbose());
        assert!(!OutputManager::new(true, true).is_verbose());
        assert!(!OutputManager::default().is_verbose());
    }

    #[test]
    fn quiet_output_writes_nothing_and_succeeds() {
        let output = OutputManager::new(false, true);
        output.info("hidden").unwrap();
        output.progress("hidden").unwrap();
        output.success("hidden").unwrap();
    }
}
