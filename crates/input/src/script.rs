//! Line-oriented action scripts.
//!
//! ```text
//! # orbit a little, then back off
//! rotate 0 15 0
//! translate 0 0 -5
//! noop
//! ```

use crate::Action;
use glam::Vec3;

/// Errors from parsing an action script. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command {command:?}")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: expected {expected} arguments, got {got}")]
    ArgumentCount {
        line: usize,
        expected: usize,
        got: usize,
    },
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },
}

/// Parse a script into actions, one command per line.
///
/// Blank lines and lines starting with `#` are skipped. Commands are
/// case-insensitive.
pub fn parse_script(source: &str) -> Result<Vec<Action>, ScriptError> {
    let mut actions = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let mut words = text.split_whitespace();
        let command = words.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = words.collect();
        let action = match command.as_str() {
            "translate" => Action::Translate(parse_vec3(line, &args)?),
            "rotate" => Action::Rotate(parse_vec3(line, &args)?),
            "noop" => {
                expect_args(line, &args, 0)?;
                Action::Noop
            }
            _ => {
                return Err(ScriptError::UnknownCommand { line, command });
            }
        };
        actions.push(action);
    }
    tracing::debug!(count = actions.len(), "parsed action script");
    Ok(actions)
}

fn expect_args(line: usize, args: &[&str], expected: usize) -> Result<(), ScriptError> {
    if args.len() != expected {
        return Err(ScriptError::ArgumentCount {
            line,
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn parse_vec3(line: usize, args: &[&str]) -> Result<Vec3, ScriptError> {
    expect_args(line, args, 3)?;
    let mut v = [0.0f32; 3];
    for (slot, value) in v.iter_mut().zip(args) {
        *slot = value.parse().map_err(|_| ScriptError::InvalidNumber {
            line,
            value: value.to_string(),
        })?;
    }
    Ok(Vec3::from_array(v))
}
