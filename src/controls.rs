//! Interactive capture-control surface
//!
//! Single-letter commands adjust capture parameters within fixed
//! per-parameter bounds. Invalid input (non-numeric, out of range) is
//! recovered locally by re-prompting; it never reaches the pipeline.
//! This surface is boundary glue only and never touches the recorder.

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::errors::MotionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ControlId {
    Brightness,
    Contrast,
    Saturation,
    Sharpness,
    FrameRate,
    ExposureTime,
}

impl ControlId {
    pub fn label(&self) -> &'static str {
        match self {
            ControlId::Brightness => "Brightness",
            ControlId::Contrast => "Contrast",
            ControlId::Saturation => "Saturation",
            ControlId::Sharpness => "Sharpness",
            ControlId::FrameRate => "Framerate",
            ControlId::ExposureTime => "Exposure time",
        }
    }
}

impl FromStr for ControlId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Brightness" => Ok(Self::Brightness),
            "Contrast" => Ok(Self::Contrast),
            "Saturation" => Ok(Self::Saturation),
            "Sharpness" => Ok(Self::Sharpness),
            "FrameRate" => Ok(Self::FrameRate),
            "ExposureTime" => Ok(Self::ExposureTime),
            _ => Err(()),
        }
    }
}

/// A single-letter command from the control prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Set(ControlId),
    Quit,
}

/// Parse one command letter. Lowercase is accepted.
pub fn parse_command(letter: char) -> Option<ControlCommand> {
    match letter.to_ascii_uppercase() {
        'B' => Some(ControlCommand::Set(ControlId::Brightness)),
        'C' => Some(ControlCommand::Set(ControlId::Contrast)),
        'A' => Some(ControlCommand::Set(ControlId::Saturation)),
        'S' => Some(ControlCommand::Set(ControlId::Sharpness)),
        'F' => Some(ControlCommand::Set(ControlId::FrameRate)),
        'X' => Some(ControlCommand::Set(ControlId::ExposureTime)),
        'Q' => Some(ControlCommand::Quit),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ControlInfo {
    pub id: ControlId,
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

pub fn all_controls() -> Vec<ControlInfo> {
    vec![
        ControlInfo {
            id: ControlId::Brightness,
            default: 50.0,
            min: 0.0,
            max: 100.0,
        },
        ControlInfo {
            id: ControlId::Contrast,
            default: 0.0,
            min: -100.0,
            max: 100.0,
        },
        ControlInfo {
            id: ControlId::Saturation,
            default: 0.0,
            min: -100.0,
            max: 100.0,
        },
        ControlInfo {
            id: ControlId::Sharpness,
            default: 0.0,
            min: -100.0,
            max: 100.0,
        },
        ControlInfo {
            id: ControlId::FrameRate,
            default: 30.0,
            min: 1.0,
            max: 120.0,
        },
        ControlInfo {
            id: ControlId::ExposureTime,
            // 0 selects automatic exposure.
            default: 0.0,
            min: 0.0,
            max: 6_000_000.0,
        },
    ]
}

fn control_info(id: ControlId) -> ControlInfo {
    all_controls()
        .into_iter()
        .find(|c| c.id == id)
        .expect("every ControlId has a bounds entry")
}

pub fn validate_control_value(id: ControlId, value: f64) -> Result<(), MotionError> {
    let info = control_info(id);
    if !value.is_finite() {
        return Err(MotionError::Control("Not a number".to_string()));
    }
    if value < info.min {
        return Err(MotionError::Control("Value is less than minimum".to_string()));
    }
    if value > info.max {
        return Err(MotionError::Control("Value is greater than maximum".to_string()));
    }
    Ok(())
}

/// Prompt until a valid value is supplied or input ends.
///
/// Empty input takes the default. Returns `Ok(None)` on EOF.
pub fn prompt_control_value<R: BufRead, W: Write>(
    id: ControlId,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<Option<f64>> {
    let info = control_info(id);

    loop {
        write!(
            output,
            "{} (Default: {}, Min: {}, Max: {}): ",
            info.id.label(),
            info.default,
            info.min,
            info.max
        )?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Some(info.default));
        }

        match trimmed.parse::<f64>() {
            Ok(value) => match validate_control_value(id, value) {
                Ok(()) => return Ok(Some(value)),
                Err(e) => writeln!(output, "{}", control_message(&e))?,
            },
            Err(_) => writeln!(output, "Not a number")?,
        }
    }
}

fn control_message(e: &MotionError) -> String {
    match e {
        MotionError::Control(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_command_letters() {
        assert_eq!(parse_command('B'), Some(ControlCommand::Set(ControlId::Brightness)));
        assert_eq!(parse_command('f'), Some(ControlCommand::Set(ControlId::FrameRate)));
        assert_eq!(parse_command('Q'), Some(ControlCommand::Quit));
        assert_eq!(parse_command('Z'), None);
    }

    #[test]
    fn test_bounds_validation() {
        assert!(validate_control_value(ControlId::Brightness, 0.0).is_ok());
        assert!(validate_control_value(ControlId::Brightness, 100.0).is_ok());
        assert!(validate_control_value(ControlId::Brightness, -1.0).is_err());
        assert!(validate_control_value(ControlId::Brightness, 101.0).is_err());
        assert!(validate_control_value(ControlId::Contrast, -100.0).is_ok());
        assert!(validate_control_value(ControlId::FrameRate, 0.5).is_err());
    }

    #[test]
    fn test_prompt_accepts_first_valid_value() {
        let mut input = Cursor::new(b"75\n".to_vec());
        let mut output = Vec::new();

        let value = prompt_control_value(ControlId::Brightness, &mut input, &mut output).unwrap();
        assert_eq!(value, Some(75.0));

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("Brightness (Default: 50, Min: 0, Max: 100): "));
    }

    #[test]
    fn test_prompt_reprompts_on_garbage_then_out_of_range() {
        let mut input = Cursor::new(b"abc\n500\n60\n".to_vec());
        let mut output = Vec::new();

        let value = prompt_control_value(ControlId::Brightness, &mut input, &mut output).unwrap();
        assert_eq!(value, Some(60.0));

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("Not a number"));
        assert!(transcript.contains("Value is greater than maximum"));
        // Three prompts: initial plus one per rejected input.
        assert_eq!(transcript.matches("Brightness (Default:").count(), 3);
    }

    #[test]
    fn test_prompt_empty_line_takes_default() {
        let mut input = Cursor::new(b"\n".to_vec());
        let mut output = Vec::new();

        let value = prompt_control_value(ControlId::FrameRate, &mut input, &mut output).unwrap();
        assert_eq!(value, Some(30.0));
    }

    #[test]
    fn test_prompt_eof_yields_none() {
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        let value = prompt_control_value(ControlId::Contrast, &mut input, &mut output).unwrap();
        assert_eq!(value, None);
    }
}
