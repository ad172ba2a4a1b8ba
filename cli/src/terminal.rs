//! Line-based terminal I/O used by the prompt loop and the token command.
//!
//! [`Terminal::prompt`] returns the line exactly as typed (minus the line
//! terminator); the default is only shown to the user. Callers decide what
//! an empty answer means. `Ok(None)` from `prompt` or `confirm` means the
//! input stream is closed.

use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

/// Minimal terminal surface needed for interactive acquisition.
pub trait Terminal {
    /// Show `text` (and `default`, if any) and read one line.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying streams.
    fn prompt(&mut self, text: &str, default: Option<&str>) -> io::Result<Option<String>>;

    /// Print `text` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the output stream.
    fn println(&mut self, text: &str) -> io::Result<()>;

    /// Ask a yes/no question; an empty answer selects `default`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying streams.
    fn confirm(&mut self, text: &str, default: bool) -> io::Result<Option<bool>>;

    /// Show hashing progress in `[0, 1]`. The default ignores it.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the output stream.
    fn progress(&mut self, fraction: f64) -> io::Result<()> {
        let _ = fraction;
        Ok(())
    }
}

/// [`Terminal`] over any buffered reader and writer.
#[derive(Debug)]
pub struct StdTerminal<R, W> {
    input: R,
    output: W,
    progress_shown: Option<String>,
}

impl StdTerminal<StdinLock<'static>, Stdout> {
    /// Terminal bound to the process's standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdTerminal<R, W> {
    /// Wrap `input` and `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            progress_shown: None,
        }
    }

    /// Consume the terminal and return its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let stripped = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(stripped);
        Ok(Some(line))
    }

    /// Terminate an in-place progress line before printing anything else.
    fn end_progress(&mut self) -> io::Result<()> {
        if self.progress_shown.take().is_some() {
            writeln!(self.output)?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Terminal for StdTerminal<R, W> {
    fn prompt(&mut self, text: &str, default: Option<&str>) -> io::Result<Option<String>> {
        self.end_progress()?;
        match default {
            Some(default) => write!(self.output, "{text} ({default}): ")?,
            None => write!(self.output, "{text}: ")?,
        }
        self.output.flush()?;
        self.read_line()
    }

    fn println(&mut self, text: &str) -> io::Result<()> {
        self.end_progress()?;
        writeln!(self.output, "{text}")
    }

    fn confirm(&mut self, text: &str, default: bool) -> io::Result<Option<bool>> {
        self.end_progress()?;
        let choices = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            write!(self.output, "{text} {choices}: ")?;
            self.output.flush()?;
            let Some(answer) = self.read_line()? else {
                return Ok(None);
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "Invalid value, choose from y, n")?,
            }
        }
    }

    fn progress(&mut self, fraction: f64) -> io::Result<()> {
        let rendered = format!("{:>3.0}%", (fraction * 100.0).clamp(0.0, 100.0));
        if self.progress_shown.as_deref() == Some(rendered.as_str()) {
            return Ok(());
        }
        write!(self.output, "\rHashing {rendered}")?;
        self.output.flush()?;
        self.progress_shown = Some(rendered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn terminal(input: &str) -> StdTerminal<Cursor<Vec<u8>>, Vec<u8>> {
        StdTerminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(terminal: StdTerminal<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(terminal.into_output()).expect("terminal output is UTF-8")
    }

    #[rstest]
    fn prompt_shows_default_and_strips_newline() {
        let mut term = terminal("typed\r\n");

        let line = term.prompt("Package Version", Some("1.0")).expect("prompt");

        assert_eq!(line.as_deref(), Some("typed"));
        assert_eq!(output(term), "Package Version (1.0): ");
    }

    #[rstest]
    fn prompt_reports_closed_input() {
        let mut term = terminal("");

        assert_eq!(term.prompt("Anything", None).expect("prompt"), None);
    }

    #[rstest]
    #[case::empty_takes_default("\n", true, Some(true))]
    #[case::explicit_no("no\n", true, Some(false))]
    #[case::retry_after_garbage("maybe\ny\n", false, Some(true))]
    #[case::closed("", true, None)]
    fn confirm_interprets_answers(
        #[case] input: &str,
        #[case] default: bool,
        #[case] expected: Option<bool>,
    ) {
        let mut term = terminal(input);

        assert_eq!(term.confirm("Proceed?", default).expect("confirm"), expected);
    }

    #[rstest]
    fn progress_line_is_closed_before_next_output() {
        let mut term = terminal("");

        term.progress(0.0).expect("progress");
        term.progress(0.001).expect("progress");
        term.progress(1.0).expect("progress");
        term.println("done").expect("println");

        assert_eq!(output(term), "\rHashing   0%\rHashing 100%\ndone\n");
    }
}
