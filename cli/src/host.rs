//! Console stand-in for the browser page.

use std::io::{self, Write};

use userboard_core::view::PAGE_CONTAINERS;
use userboard_core::{ApiError, Container, MemoryDocument, PageHost};

/// Writes alerts to `out` and errors to `err`; navigation is recorded and
/// echoed, since there is no page to leave.
pub struct ConsoleHost<O, E> {
    out: O,
    err: E,
    pub navigations: Vec<String>,
}

impl ConsoleHost<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleHost<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            navigations: Vec::new(),
        }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

// Console writes are best effort; a closed pipe is not a page failure.
impl<O: Write, E: Write> PageHost for ConsoleHost<O, E> {
    fn alert(&mut self, message: &str) {
        let _ = writeln!(self.out, "{message}");
    }

    fn navigate(&mut self, path: &str) {
        let _ = writeln!(self.out, "-> {path}");
        self.navigations.push(path.to_string());
    }

    fn report_error(&mut self, error: &ApiError) {
        let _ = writeln!(self.err, "error: {error}");
    }
}

/// Print every page container in page order, one row per line.
pub fn print_document(out: &mut impl Write, document: &MemoryDocument) -> io::Result<()> {
    for id in PAGE_CONTAINERS {
        writeln!(out, "#{id}")?;
        let rows = document.container(id).map(|c| c.rows()).unwrap_or_default();
        if rows.is_empty() {
            writeln!(out, "  (empty)")?;
        }
        for row in rows {
            writeln!(out, "  {}", row.text)?;
        }
    }
    Ok(())
}
