//! Line parser for the SBS-1 (BaseStation) text format.
//!
//! Each record is a comma-separated line:
//!
//! ```text
//! MSG,3,1,1,A1B2C3,1,2020/11/14,21:02:27.071,2020/11/14,21:02:27.071,ACA738 ,...
//!  0  1 2 3   4    5     6          7             8          9         10
//! ```
//!
//! Only field 7 (time generated) and field 10 (callsign) are used.

use crate::types::PositionEvent;
use chrono::NaiveTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Record too short: need at least {need} fields, got {got}")]
    TooFewFields { need: usize, got: usize },
    #[error("Invalid timestamp: {0:?}")]
    InvalidTime(String),
}

/// Index of the "time generated" field.
const TIME_FIELD: usize = 7;
/// Index of the callsign field.
const CALLSIGN_FIELD: usize = 10;

/// Message types that open a BaseStation record.
const MESSAGE_TYPES: [&str; 6] = ["MSG", "SEL", "ID", "AIR", "STA", "CLK"];

/// Returns true if the line starts with a BaseStation message type.
pub fn is_record(line: &str) -> bool {
    let kind = line.split(',').next().unwrap_or_default().trim();
    MESSAGE_TYPES.contains(&kind)
}

/// Parse one record into a position event.
pub fn parse_record(line: &str) -> Result<PositionEvent, ParseError> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();

    if fields.len() <= TIME_FIELD {
        return Err(ParseError::TooFewFields {
            need: TIME_FIELD + 1,
            got: fields.len(),
        });
    }

    let time = parse_time(fields[TIME_FIELD])?;
    let callsign = fields
        .get(CALLSIGN_FIELD)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(PositionEvent { time, callsign })
}

/// Parse `H:M:S[.fraction]`. The fraction is discarded.
pub fn parse_time(s: &str) -> Result<NaiveTime, ParseError> {
    let s = s.trim();
    let whole = s.split('.').next().unwrap_or_default();
    NaiveTime::parse_from_str(whole, "%H:%M:%S").map_err(|_| ParseError::InvalidTime(s.to_string()))
}
