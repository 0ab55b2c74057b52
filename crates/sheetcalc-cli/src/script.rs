//! Edit script interpreter
//!
//! One command per line:
//!
//! ```text
//! # comment
//! set A1 42
//! set B1 =A1*2
//! get B1
//! clear A1
//! size
//! values
//! texts
//! ```

use anyhow::{anyhow, bail, Context, Result};
use sheetcalc::prelude::*;
use std::io::Write;

/// A single parsed script command
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    Set(Position, &'a str),
    Clear(Position),
    Get(Position),
    Size,
    Values,
    Texts,
}

/// Parse one script line; blank lines and comments yield `None`
pub fn parse_line(line: &str) -> Result<Option<Command<'_>>> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    if line.trim_end().is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let command = match name {
        "set" => {
            let (pos, text) = rest.split_once(' ').unwrap_or((rest, ""));
            Command::Set(parse_position(pos)?, text)
        }
        "clear" => Command::Clear(parse_position(rest.trim())?),
        "get" => Command::Get(parse_position(rest.trim())?),
        "size" => Command::Size,
        "values" => Command::Values,
        "texts" => Command::Texts,
        other => bail!("Unknown command '{}'", other),
    };
    Ok(Some(command))
}

fn parse_position(text: &str) -> Result<Position> {
    text.parse::<Position>()
        .map_err(|_| anyhow!("Invalid cell position '{}'", text))
}

/// Runs scripts against a sheet, writing command output to `out`
pub struct Interpreter<W: Write> {
    sheet: Sheet,
    out: W,
    strict: bool,
    failures: usize,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W, strict: bool) -> Self {
        Self {
            sheet: Sheet::new(),
            out,
            strict,
            failures: 0,
        }
    }

    #[cfg(test)]
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Number of commands rejected so far
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Run every line of `source`
    ///
    /// A failing command is reported on stderr and skipped, or aborts the
    /// run when the interpreter is strict.
    pub fn run(&mut self, source: &str) -> Result<()> {
        for (index, line) in source.lines().enumerate() {
            let result = parse_line(line).and_then(|command| match command {
                Some(command) => self.execute(command),
                None => Ok(()),
            });

            if let Err(err) = result {
                let err = err.context(format!("line {}: {}", index + 1, line.trim()));
                if self.strict {
                    return Err(err);
                }
                eprintln!("error: {:#}", err);
                self.failures += 1;
            }
        }
        Ok(())
    }

    /// Execute a single command
    pub fn execute(&mut self, command: Command<'_>) -> Result<()> {
        match command {
            Command::Set(pos, text) => self
                .sheet
                .set_cell(pos, text)
                .with_context(|| format!("Failed to set {}", pos))?,
            Command::Clear(pos) => self
                .sheet
                .clear_cell(pos)
                .with_context(|| format!("Failed to clear {}", pos))?,
            Command::Get(pos) => {
                let value = self.sheet.value(pos)?.unwrap_or_default();
                writeln!(self.out, "{}\t{}", pos, value)?;
            }
            Command::Size => {
                let size = self.sheet.printable_size();
                writeln!(self.out, "{}\t{}", size.rows, size.cols)?;
            }
            Command::Values => self.sheet.print_values(&mut self.out)?,
            Command::Texts => self.sheet.print_texts(&mut self.out)?,
        }
        Ok(())
    }

    /// Finish and hand back the output
    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(s: &str) -> Position {
        Position::parse(s)
    }

    fn run(source: &str) -> (String, usize) {
        let mut interp = Interpreter::new(Vec::new(), false);
        interp.run(source).unwrap();
        let failures = interp.failures();
        (String::from_utf8(interp.into_output()).unwrap(), failures)
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   # note").unwrap(), None);
        assert_eq!(
            parse_line("set A1 =1 + 2").unwrap(),
            Some(Command::Set(p("A1"), "=1 + 2"))
        );
        assert_eq!(
            parse_line("set B2 ").unwrap(),
            Some(Command::Set(p("B2"), ""))
        );
        assert_eq!(parse_line("set C3").unwrap(), Some(Command::Set(p("C3"), "")));
        assert_eq!(parse_line("clear A1").unwrap(), Some(Command::Clear(p("A1"))));
        assert_eq!(parse_line("get Z9\r").unwrap(), Some(Command::Get(p("Z9"))));
        assert_eq!(parse_line("size").unwrap(), Some(Command::Size));
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(parse_line("frobnicate A1").is_err());
        assert!(parse_line("set a1 1").is_err());
        assert!(parse_line("get").is_err());
    }

    #[test]
    fn test_run_script() {
        let (out, failures) = run("set A1 2\nset B1 =A1*3\nget B1\nsize\nvalues\n");
        assert_eq!(failures, 0);
        assert_eq!(out, "B1\t6\n1\t2\n2\t6\n");
    }

    #[test]
    fn test_run_keeps_going_after_errors() {
        let (out, failures) = run("set A1 =A1\nset A2 =1+\nset A3 x\ntexts\n");
        assert_eq!(failures, 2);
        assert_eq!(out, "\n\nx\n");
    }

    #[test]
    fn test_strict_run_stops() {
        let mut interp = Interpreter::new(Vec::new(), true);
        let err = interp.run("set A1 1\nset B1 =B1\nset C1 3").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
        assert!(interp.sheet().cell(p("C1")).unwrap().is_none());
    }
}
