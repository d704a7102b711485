// Operator panel rendered on the terminal

use std::io::Write;

use crate::hardware::traits::Display;
use crate::hardware::types::*;

/// Renders the character display as a framed block on stdout
#[derive(Debug)]
pub struct ConsoleDisplay {
    columns: usize,
    rows: usize,
    backlight: Rgb,
    lines: Vec<String>,
}

impl ConsoleDisplay {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            backlight: Rgb::OFF,
            lines: Vec::new(),
        }
    }

    /// Lines currently on the panel
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn backlight(&self) -> Rgb {
        self.backlight
    }

    fn draw(&self) -> Result<(), HardwareError> {
        let frame = render_frame(&self.lines, self.columns, self.rows, describe(self.backlight));
        let mut out = std::io::stdout().lock();
        out.write_all(frame.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| HardwareError::Display {
                message: e.to_string(),
            })
    }
}

/// Fit text onto the panel: one entry per row, each cut to the column count
pub fn layout_text(text: &str, columns: usize, rows: usize) -> Vec<String> {
    text.split('\n')
        .take(rows)
        .map(|line| line.chars().take(columns).collect())
        .collect()
}

fn render_frame(lines: &[String], columns: usize, rows: usize, backlight: Color) -> String {
    let border = format!("+{}+", "-".repeat(columns));
    let mut frame = format!("{border} [{backlight}]\n");
    for row in 0..rows {
        let line = lines.get(row).map(String::as_str).unwrap_or("");
        frame.push_str(&format!("|{line:<columns$}|\n"));
    }
    frame.push_str(&border);
    frame.push('\n');
    frame
}

fn describe(rgb: Rgb) -> Color {
    [Color::Red, Color::Green, Color::Blue, Color::White]
        .into_iter()
        .find(|color| color.rgb() == rgb)
        .unwrap_or(Color::Off)
}

impl Display for ConsoleDisplay {
    fn show_text(&mut self, text: &str, color: Color, clear_first: bool) -> Result<(), HardwareError> {
        self.backlight = color.rgb();
        let incoming = layout_text(text, self.columns, self.rows);
        if clear_first {
            self.lines = incoming;
        } else {
            // Without a clear the new text overwrites from the home position
            for (row, line) in incoming.into_iter().enumerate() {
                match self.lines.get_mut(row) {
                    Some(existing) => {
                        let tail: String = existing.chars().skip(line.chars().count()).collect();
                        *existing = format!("{line}{tail}");
                    }
                    None => self.lines.push(line),
                }
            }
        }
        self.draw()
    }

    fn set_backlight(&mut self, rgb: Rgb) -> Result<(), HardwareError> {
        self.backlight = rgb;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HardwareError> {
        self.lines.clear();
        self.draw()
    }
}
