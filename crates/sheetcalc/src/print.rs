//! Tab-separated rendering of a sheet
//!
//! Both renderings cover [`Sheet::printable_size`]: one line per row, cells
//! separated by tabs. Positions without content render as empty fields.

use std::io::{self, Write};

use sheetcalc_core::Position;

use crate::cell::Cell;
use crate::sheet::Sheet;

impl Sheet {
    /// Write the value of every cell in the printable area
    pub fn print_values<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.values_string().as_bytes())
    }

    /// Write the text of every cell in the printable area
    pub fn print_texts<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.texts_string().as_bytes())
    }

    /// Values of the printable area as a string
    pub fn values_string(&self) -> String {
        self.render(|pos, cell| self.resolve(pos, cell).to_string())
    }

    /// Texts of the printable area as a string
    pub fn texts_string(&self) -> String {
        self.render(|_, cell| cell.text())
    }

    fn render<F>(&self, field: F) -> String
    where
        F: Fn(Position, &Cell) -> String,
    {
        let size = self.printable_size();
        let mut buf = String::new();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    buf.push('\t');
                }
                let pos = Position::new(row, col);
                if let Some(cell) = self.entry(pos) {
                    buf.push_str(&field(pos, cell));
                }
            }
            buf.push('\n');
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(s: &str) -> Position {
        Position::parse(s)
    }

    #[test]
    fn test_print_empty_sheet() {
        let sheet = Sheet::new();
        assert_eq!(sheet.values_string(), "");
        assert_eq!(sheet.texts_string(), "");
    }

    #[test]
    fn test_print_values_and_texts() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "=(1+2)*2").unwrap();
        sheet.set_cell(p("B1"), "=1/0").unwrap();
        sheet.set_cell(p("A2"), "'=text").unwrap();
        sheet.set_cell(p("C2"), "meow").unwrap();

        assert_eq!(sheet.values_string(), "6\t#DIV/0!\t\n=text\t\tmeow\n");
        assert_eq!(sheet.texts_string(), "=(1+2)*2\t=1/0\t\n'=text\t\tmeow\n");
    }

    #[test]
    fn test_print_to_writer() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("B2"), "=A1+4").unwrap();

        let mut out = Vec::new();
        sheet.print_values(&mut out).unwrap();
        assert_eq!(out, b"\t\n\t4\n");
    }

    #[test]
    fn test_print_deep_chain_evaluates_dependencies_first() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "1").unwrap();
        for row in 1..300 {
            let above = Position::new(row - 1, 0);
            sheet
                .set_cell(Position::new(row, 0), format!("={}+1", above))
                .unwrap();
        }

        let values = sheet.values_string();
        assert_eq!(values.lines().count(), 300);
        assert_eq!(values.lines().last(), Some("300"));
    }
}
