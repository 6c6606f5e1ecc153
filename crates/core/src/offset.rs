use crate::time::TimeError;
use regex::Regex;
use std::sync::OnceLock;

static RE_TRAILING_OFFSET: OnceLock<Regex> = OnceLock::new();
// Offset tags may omit the colon.
static RE_OFFSET_VALUE: OnceLock<Regex> = OnceLock::new();

pub fn trailing_offset(time: &str) -> Option<&str> {
    let re = RE_TRAILING_OFFSET
        .get_or_init(|| Regex::new(r"[+-]\d{2}:\d{2}$").expect("valid offset pattern"));
    re.find(time.trim_end()).map(|m| m.as_str())
}

pub fn has_offset(time: &str) -> bool {
    trailing_offset(time).is_some()
}

pub fn normalize_offset(raw: &str) -> Option<String> {
    let re = RE_OFFSET_VALUE
        .get_or_init(|| Regex::new(r"^([+-])(\d{2}):?(\d{2})$").expect("valid offset pattern"));
    let caps = re.captures(raw.trim())?;
    let sign = caps.get(1)?.as_str();
    let hours = caps.get(2)?.as_str();
    let minutes = caps.get(3)?.as_str();
    if hours.parse::<u32>().ok()? > 14 || minutes.parse::<u32>().ok()? > 59 {
        return None;
    }
    Some(format!("{sign}{hours}:{minutes}"))
}

pub fn with_offset(time: &str, offset: Option<&str>) -> Result<String, TimeError> {
    let time = time.trim();
    if has_offset(time) {
        return Ok(time.to_string());
    }
    match offset {
        Some(offset) => Ok(format!("{time}{offset}")),
        None => Err(TimeError::MissingOffset(time.to_string())),
    }
}
