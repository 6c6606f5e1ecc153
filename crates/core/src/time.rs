use crate::extract::{date_time, offset_time};
use crate::format::format_canonical;
use crate::metadata::MetadataMap;
use crate::offset::with_offset;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("撮影日時もファイル更新日時もありません")]
    MissingTimestamp,
    #[error("UTCオフセットを特定できません: {0}")]
    MissingOffset(String),
    #[error("日時の形式を解釈できません: {0}")]
    UnrecognizedFormat(String),
}

pub fn photo_time(metadata: &MetadataMap) -> Result<String, TimeError> {
    let time = date_time(metadata).ok_or(TimeError::MissingTimestamp)?;
    let offset = offset_time(metadata);
    let time = with_offset(time, offset.as_deref())?;
    format_canonical(&time)
}
