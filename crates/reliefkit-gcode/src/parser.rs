//! Line tokenizer for the textual motion-stream micro-format.
//!
//! Lines are newline-separated; each word is a single command letter
//! followed by a numeric value (`G1 X12.34 Y5.6 F900`), `;` starts a
//! comment running to end of line, and blank lines are significant (they
//! are preserved as empty markers by the consumers).

use crate::command::MotionCommand;
use crate::error::ParseLineError;

/// Parse one motion-stream line into a [`MotionCommand`].
///
/// A trailing `;` comment is split off first and stored on the command.
/// When a letter repeats, the last occurrence wins. Letters outside the
/// record (`T`, `H`, ...) are tolerated and dropped as long as their value
/// still parses; anything else fails the whole line.
pub fn parse_line(line: &str) -> Result<MotionCommand, ParseLineError> {
    let mut cmd = MotionCommand::default();

    let body = match line.split_once(';') {
        Some((body, comment)) => {
            cmd.comment = Some(comment.trim().to_string());
            body
        }
        None => line,
    };

    for word in body.split_whitespace() {
        let mut chars = word.chars();
        let letter = match chars.next() {
            // split_whitespace never yields an empty word
            None => continue,
            Some(c) => c.to_ascii_uppercase(),
        };
        let value = chars.as_str();
        let malformed = || ParseLineError {
            line: line.to_string(),
            word: word.to_string(),
        };

        match letter {
            'G' => cmd.g = Some(value.parse().map_err(|_| malformed())?),
            'M' => cmd.m = Some(value.parse().map_err(|_| malformed())?),
            'X' => cmd.x = Some(value.parse().map_err(|_| malformed())?),
            'Y' => cmd.y = Some(value.parse().map_err(|_| malformed())?),
            'Z' => cmd.z = Some(value.parse().map_err(|_| malformed())?),
            'F' => cmd.f = Some(value.parse().map_err(|_| malformed())?),
            'S' => cmd.s = Some(value.parse().map_err(|_| malformed())?),
            'P' => cmd.p = Some(value.parse().map_err(|_| malformed())?),
            c if c.is_ascii_alphabetic() => {
                value.parse::<f64>().map_err(|_| malformed())?;
            }
            _ => return Err(malformed()),
        }
    }

    Ok(cmd)
}
