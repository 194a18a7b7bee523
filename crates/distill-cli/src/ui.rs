//! UI utilities for the CLI

use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use std::io::{self, IsTerminal, Write};

use distill_core::Result;

const PROMPT: &str = "distill>";

/// Display startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(58, terminal_width.saturating_sub(4));

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));
    let empty_line = format!("│{}│", " ".repeat(banner_width - 2));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let lines = vec![
        "distill - ask your interview corpus",
        "",
        "• populate  - ingest transcripts into the index",
        "• <text>    - ask a question over the corpus",
        "• help      - show commands",
        "",
        "v0.1.0",
    ];

    for line in lines {
        if line.is_empty() {
            println!("{}", empty_line.blue());
        } else {
            let padding = banner_width.saturating_sub(line.chars().count() + 4);
            println!("{}", format!("│  {}{}│", line, " ".repeat(padding)).blue());
        }
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - ingest all transcripts under the data directory", "populate".green());
    println!("  {} - show this help message", "help".green());
    println!("  {} - exit the application", "exit/quit".green());
    println!();
    println!("{}", "Anything else is treated as a question, e.g.:".bold());
    println!("  what do users think about pricing?");
    println!("  which features break most often?");
}

fn redraw(input: &str) -> io::Result<()> {
    print!(
        "\r{} {}  \r{} {}",
        PROMPT.green().bold(),
        " ".repeat(60),
        PROMPT.green().bold(),
        input
    );
    io::stdout().flush()
}

/// Line editor state for the raw-mode prompt. The cursor is a char offset,
/// so edits around multi-byte input stay on char boundaries.
struct LineBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl LineBuffer {
    fn new() -> Self {
        Self {
            chars: Vec::new(),
            cursor: 0,
        }
    }

    fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    fn replace_with(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
    }

    fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    fn text(&self) -> String {
        self.chars.iter().collect()
    }
}

/// Handle input with command history navigation
pub async fn handle_input_with_history(history: &mut Vec<String>) -> Result<String> {
    // Piped input: read a line from stdin directly
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        let bytes = io::stdin().read_line(&mut input)?;
        if bytes == 0 {
            // end of piped input behaves like "exit"
            return Ok("exit".to_string());
        }
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(input);
    }

    enable_raw_mode()?;
    let mut buffer = LineBuffer::new();
    let mut history_index: Option<usize> = None;

    print!("{} ", PROMPT.green().bold());
    io::stdout().flush()?;

    loop {
        if let Event::Key(key_event) = event::read()? {
            match key_event.code {
                KeyCode::Enter => {
                    disable_raw_mode()?;
                    println!();
                    let input = buffer.text();
                    if !input.is_empty() {
                        history.push(input.clone());
                    }
                    return Ok(input);
                }
                // Raw mode suppresses SIGINT, so Ctrl+C is handled here
                KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                    disable_raw_mode()?;
                    println!();
                    eprintln!("{}", "Interrupted, cleaning up...".yellow());
                    std::process::exit(130);
                }
                KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                    buffer.insert(c);
                    redraw(&buffer.text())?;
                }
                KeyCode::Backspace => {
                    if buffer.backspace() {
                        redraw(&buffer.text())?;
                    }
                }
                KeyCode::Up => {
                    if !history.is_empty() {
                        let new_index = match history_index {
                            None => history.len() - 1,
                            Some(idx) if idx > 0 => idx - 1,
                            Some(idx) => idx,
                        };
                        history_index = Some(new_index);
                        buffer.replace_with(&history[new_index]);
                        redraw(&buffer.text())?;
                    }
                }
                KeyCode::Down => {
                    if let Some(idx) = history_index {
                        if idx < history.len() - 1 {
                            history_index = Some(idx + 1);
                            buffer.replace_with(&history[idx + 1]);
                        } else {
                            history_index = None;
                            buffer.clear();
                        }
                        redraw(&buffer.text())?;
                    }
                }
                KeyCode::Esc => {
                    disable_raw_mode()?;
                    println!();
                    return Ok(String::new());
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_buffer_appends_after_multibyte_chars() {
        let mut buffer = LineBuffer::new();
        for c in "café".chars() {
            buffer.insert(c);
        }
        buffer.insert('s');
        assert_eq!(buffer.text(), "cafés");
    }

    #[test]
    fn test_line_buffer_backspace_over_multibyte_char() {
        let mut buffer = LineBuffer::new();
        for c in "café".chars() {
            buffer.insert(c);
        }
        assert!(buffer.backspace());
        assert_eq!(buffer.text(), "caf");
    }

    #[test]
    fn test_line_buffer_backspace_on_empty_is_noop() {
        let mut buffer = LineBuffer::new();
        assert!(!buffer.backspace());
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_line_buffer_history_replace_moves_cursor_to_end() {
        let mut buffer = LineBuffer::new();
        buffer.replace_with("naïve query");
        buffer.insert('?');
        assert_eq!(buffer.text(), "naïve query?");

        buffer.clear();
        assert_eq!(buffer.text(), "");
    }
}
