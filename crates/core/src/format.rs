use crate::time::TimeError;
use chrono::DateTime;

pub const INPUT_FORMATS: &[&str] = &["%Y:%m:%d %H:%M:%S%:z", "%Y:%m:%d %H:%M:%S%.f%:z"];

pub const OUTPUT_FORMAT: &str = "%Y%m%d_%H%M%S%z";

pub fn format_canonical(time: &str) -> Result<String, TimeError> {
    let time = time.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(time, fmt).ok())
        .map(|dt| dt.format(OUTPUT_FORMAT).to_string())
        .ok_or_else(|| TimeError::UnrecognizedFormat(time.to_string()))
}
