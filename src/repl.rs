//! Blocking read-execute-print loop.

use std::borrow::Cow;
use std::io::{self, BufRead, Write};

use tracing::info;

use crate::executor::{Control, execute};
use crate::statement::Statement;
use crate::table::Table;

struct InputBuffer {
    buffer: Vec<u8>,
}

impl InputBuffer {
    fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Reads the next line into the buffer. Returns `false` at end of input.
    fn read_input(&mut self, input: &mut impl BufRead) -> io::Result<bool> {
        self.buffer.clear();
        let read = input.read_until(b'\n', &mut self.buffer)?;
        Ok(read > 0)
    }

    fn line(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }
}

pub struct Repl {
    prompt: String,
    input_buffer: InputBuffer,
}

impl Repl {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            input_buffer: InputBuffer::new(),
        }
    }

    /// Runs statements from `input` against `table` until `.exit` or end of
    /// input, writing responses to `output`.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
        table: &mut Table,
    ) -> io::Result<()> {
        info!(max_rows = table.max_rows(), "session started");

        loop {
            self.print_prompt(&mut output)?;
            if !self.input_buffer.read_input(&mut input)? {
                info!("end of input");
                break;
            }

            let statement = Statement::parse(&self.input_buffer.line());
            let outcome = execute(statement, table);
            for line in &outcome.lines {
                writeln!(output, "{line}")?;
            }
            if outcome.control == Control::Stop {
                break;
            }
        }

        output.flush()?;
        info!(rows = table.len(), pages = table.num_pages(), "session ended");
        Ok(())
    }

    fn print_prompt(&self, output: &mut impl Write) -> io::Result<()> {
        output.write_all(self.prompt.as_bytes())?;
        output.flush()
    }
}
