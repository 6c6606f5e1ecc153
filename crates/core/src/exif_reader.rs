use crate::metadata::{
    MetadataMap, MetadataProvider, DATE_TIME_ORIGINAL, FILE_MODIFY_DATE, OFFSET_TIME_ORIGINAL,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use exif::{In, Reader, Tag};
use log::debug;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

const FILE_MODIFY_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S%:z";

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeExifProvider;

impl MetadataProvider for NativeExifProvider {
    fn read_metadata(&mut self, path: &Path) -> Result<MetadataMap> {
        read_exif_metadata(path)
    }
}

pub fn read_exif_metadata(path: &Path) -> Result<MetadataMap> {
    let mut metadata = MetadataMap::new();

    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("更新日時を取得できませんでした: {}", path.display()))?;
    let modified: DateTime<Local> = DateTime::from(modified);
    metadata.insert(
        FILE_MODIFY_DATE.to_string(),
        modified.format(FILE_MODIFY_DATE_FORMAT).to_string(),
    );

    let file = File::open(path)
        .with_context(|| format!("EXIF読み込み対象を開けませんでした: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = match Reader::new().read_from_container(&mut buf) {
        Ok(exif) => exif,
        Err(err) => {
            debug!("EXIFなし、更新日時のみ使用します: {}: {err}", path.display());
            return Ok(metadata);
        }
    };

    for (tag, key) in [
        (Tag::DateTimeOriginal, DATE_TIME_ORIGINAL),
        (Tag::OffsetTimeOriginal, OFFSET_TIME_ORIGINAL),
    ] {
        if let Some(value) = ascii_value(&exif, tag) {
            metadata.insert(key.to_string(), value);
        }
    }

    Ok(metadata)
}

fn ascii_value(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        exif::Value::Ascii(ref parts) => parts
            .first()
            .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
            .filter(|v| !v.is_empty()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::read_exif_metadata;
    use crate::metadata::{DATE_TIME_ORIGINAL, FILE_MODIFY_DATE, OFFSET_TIME_ORIGINAL};
    use crate::time::photo_time;
    use exif::experimental::Writer;
    use exif::{Field, In, Tag, Value};
    use regex::Regex;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn ascii_field(tag: Tag, value: &str) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![value.as_bytes().to_vec()]),
        }
    }

    // SOI, APP1 "Exif\0\0" + TIFF, EOI.
    fn jpeg_with_exif(fields: &[Field]) -> Vec<u8> {
        let mut writer = Writer::new();
        for field in fields {
            writer.push_field(field);
        }
        let mut tiff = Cursor::new(Vec::new());
        writer.write(&mut tiff, false).expect("write tiff");
        let tiff = tiff.into_inner();

        let segment_len = u16::try_from(2 + 6 + tiff.len()).expect("segment fits");
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
        jpeg.extend_from_slice(&segment_len.to_be_bytes());
        jpeg.extend_from_slice(b"Exif\0\0");
        jpeg.extend_from_slice(&tiff);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        jpeg
    }

    #[test]
    fn reads_capture_time_and_offset_from_exif() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("IMG_0001.jpg");
        let jpeg = jpeg_with_exif(&[
            ascii_field(Tag::DateTimeOriginal, "2022:05:08 12:00:26"),
            ascii_field(Tag::OffsetTimeOriginal, "+09:00"),
        ]);
        fs::write(&path, jpeg).expect("write photo");

        let metadata = read_exif_metadata(&path).expect("exif should be readable");
        assert_eq!(
            metadata.get(DATE_TIME_ORIGINAL).map(String::as_str),
            Some("2022:05:08 12:00:26")
        );
        assert_eq!(
            metadata.get(OFFSET_TIME_ORIGINAL).map(String::as_str),
            Some("+09:00")
        );
        assert!(metadata.contains_key(FILE_MODIFY_DATE));
        assert_eq!(photo_time(&metadata).as_deref(), Ok("20220508_120026+0900"));
    }

    #[test]
    fn capture_time_without_offset_tag_takes_offset_from_modify_date() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("IMG_0002.jpg");
        let jpeg = jpeg_with_exif(&[ascii_field(Tag::DateTimeOriginal, "2022:05:08 12:00:26")]);
        fs::write(&path, jpeg).expect("write photo");

        let metadata = read_exif_metadata(&path).expect("exif should be readable");
        assert!(!metadata.contains_key(OFFSET_TIME_ORIGINAL));
        let time = photo_time(&metadata).expect("offset comes from modify date");
        assert!(time.starts_with("20220508_120026"), "unexpected time: {time}");
    }

    #[test]
    fn file_without_exif_still_reports_modify_date_with_offset() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("IMG_0001.jpg");
        fs::write(&path, b"not really a jpeg").expect("write photo");

        let metadata = read_exif_metadata(&path).expect("modify date should be readable");
        let modified = metadata.get(FILE_MODIFY_DATE).expect("modify date tag");
        let pattern = Regex::new(r"^\d{4}:\d{2}:\d{2} \d{2}:\d{2}:\d{2}[+-]\d{2}:\d{2}$")
            .expect("valid pattern");
        assert!(pattern.is_match(modified), "unexpected format: {modified}");
        assert!(!metadata.contains_key(DATE_TIME_ORIGINAL));
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        assert!(read_exif_metadata(&temp.path().join("missing.jpg")).is_err());
    }
}
