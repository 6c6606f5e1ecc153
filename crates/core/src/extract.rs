use crate::metadata::{
    non_blank, MetadataMap, DATE_TIME_ORIGINAL, FILE_MODIFY_DATE, OFFSET_TIME_ORIGINAL,
};
use crate::offset::{normalize_offset, trailing_offset};
use log::debug;

pub fn date_time(metadata: &MetadataMap) -> Option<&str> {
    non_blank(metadata, DATE_TIME_ORIGINAL).or_else(|| non_blank(metadata, FILE_MODIFY_DATE))
}

pub fn offset_time(metadata: &MetadataMap) -> Option<String> {
    if let Some(raw) = non_blank(metadata, OFFSET_TIME_ORIGINAL) {
        match normalize_offset(raw) {
            Some(offset) => return Some(offset),
            None => debug!("{OFFSET_TIME_ORIGINAL} を無視します: {raw:?}"),
        }
    }

    // exiftool always renders FileModifyDate with an offset.
    non_blank(metadata, FILE_MODIFY_DATE)
        .and_then(trailing_offset)
        .map(str::to_string)
}
