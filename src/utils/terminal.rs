//! Terminal helpers: color detection and output sanitization
//!
//! # Security: Terminal Injection Prevention
//!
//! Transcript content is written by other programs (and by whatever tools the assistant ran),
//! so it may contain escape sequences that clear the screen, move the cursor, retitle the
//! window or change colors. The renderer passes every piece of transcript text through
//! [`strip_ansi_codes`] before it reaches the terminal or an export file.

use std::env;
use std::io;

use is_terminal::IsTerminal;

/// Whether stdout should receive ANSI colors
///
/// Colors are used only when stdout is a terminal and `NO_COLOR` is unset or empty.
pub fn supports_color() -> bool {
    if !io::stdout().is_terminal() {
        return false;
    }
    env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
}

/// Strips ANSI escape codes from a string
///
/// Removes CSI sequences (`ESC [ ... letter`) such as colors and cursor movement, OSC
/// sequences (`ESC ] ... BEL` or `ESC ] ... ESC \`) such as window titles and hyperlinks, and
/// other control characters like bell (\x07) and backspace (\x08). Tab, newline and carriage
/// return are preserved.
///
/// # Examples
///
/// ```
/// use chat_history_viewer::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Skip until the final letter of the CSI sequence
                    for next_ch in chars.by_ref() {
                        if next_ch.is_ascii_alphabetic() {
                            break;
                        }
                    }
                    continue;
                }
                Some(']') => {
                    chars.next();
                    // OSC runs until BEL or the ST terminator (ESC \)
                    while let Some(next_ch) = chars.next() {
                        if next_ch == '\x07' {
                            break;
                        }
                        if next_ch == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                    continue;
                }
                _ => {}
            }
        }

        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            continue;
        }

        result.push(ch);
    }

    result
}
