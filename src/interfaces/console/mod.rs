mod result_table;

pub use result_table::{format_value, render_result};

use std::io::Write;

use crate::domain::error::Result;

/// Human-readable progress written to stdout (or a buffer in tests)
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn line(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", message)?;
        Ok(())
    }

    pub fn step(&mut self, number: usize, title: &str) -> Result<()> {
        self.line(&format!("Step {}: {}...", number, title))
    }

    pub fn error(&mut self, message: &str) -> Result<()> {
        self.line(&format!("Error: {}", message))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
