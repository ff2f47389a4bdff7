//! Line-based prompter for missing generation parameters.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};

use ngs_core::application::Prompter;

/// Writes the question to `output`, then reads one line from `input`.
///
/// End of input is an empty answer, so piping fewer lines than there are
/// questions falls through to the defaults.
pub struct LinePrompter<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }
}

impl LinePrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's standard streams.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&self, question: &str) -> io::Result<String> {
        {
            let mut out = self.output.borrow_mut();
            write!(out, "{question}")?;
            out.flush()?;
        }

        let mut line = String::new();
        self.input.borrow_mut().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_one_line_per_question() {
        let prompter = LinePrompter::new(Cursor::new("acme\r\napi\n"), Vec::new());

        assert_eq!(prompter.ask("Name: ").unwrap(), "acme");
        assert_eq!(prompter.ask("Module: ").unwrap(), "api");

        let shown = String::from_utf8(prompter.output.into_inner()).unwrap();
        assert_eq!(shown, "Name: Module: ");
    }

    #[test]
    fn end_of_input_is_an_empty_answer() {
        let prompter = LinePrompter::new(Cursor::new(""), Vec::new());
        assert_eq!(prompter.ask("Port: ").unwrap(), "");
    }
}
