//! Wire-format conversion for the synthesis request body.
//!
//! Rate is held as a fraction and pitch in Hz everywhere in the session;
//! this is the single place they become the string encoding the backend
//! expects.

/// Serialize a fractional rate offset as a signed integer percentage,
/// `0.12` -> `"+12%"`, `-0.05` -> `"-5%"`.
pub fn wire_rate(rate: f64) -> String {
    let percent = (rate * 100.0).round() as i64;
    if percent >= 0 {
        format!("+{percent}%")
    } else {
        format!("{percent}%")
    }
}

/// Serialize a pitch offset in Hz, `7` -> `"+7Hz"`, `0` -> `"+0Hz"`.
pub fn wire_pitch(pitch: i32) -> String {
    if pitch >= 0 {
        format!("+{pitch}Hz")
    } else {
        format!("{pitch}Hz")
    }
}
