use crate::metadata::{MetadataMap, MetadataProvider};
use anyhow::{bail, Context, Result};
use exiftool::ExifTool;
use serde_json::Value;
use std::path::Path;

const GROUPED_TAGS_ARG: &str = "-G";

pub struct ExifToolProvider {
    exiftool: ExifTool,
}

impl ExifToolProvider {
    pub fn new(executable: Option<&Path>) -> Result<Self> {
        let exiftool = match executable {
            Some(path) => ExifTool::with_executable(path)
                .with_context(|| format!("exiftoolを起動できませんでした: {}", path.display()))?,
            None => ExifTool::new().context("exiftoolを起動できませんでした")?,
        };
        Ok(Self { exiftool })
    }
}

impl MetadataProvider for ExifToolProvider {
    fn read_metadata(&mut self, path: &Path) -> Result<MetadataMap> {
        let value = self
            .exiftool
            .json(path, &[GROUPED_TAGS_ARG])
            .with_context(|| format!("メタデータを読めませんでした: {}", path.display()))?;
        to_metadata_map(&value)
            .with_context(|| format!("メタデータが空です: {}", path.display()))
    }
}

fn to_metadata_map(value: &Value) -> Result<MetadataMap> {
    let record = match value {
        Value::Array(records) => records.first(),
        other => Some(other),
    };
    let Some(Value::Object(fields)) = record else {
        bail!("exiftoolの出力がオブジェクトではありません");
    };

    let metadata: MetadataMap = fields
        .iter()
        .filter(|(key, _)| key.as_str() != "SourceFile")
        .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key.clone(), v)))
        .collect();

    if metadata.is_empty() {
        bail!("タグが1件もありません");
    }
    Ok(metadata)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::to_metadata_map;
    use crate::metadata::{DATE_TIME_ORIGINAL, FILE_MODIFY_DATE, OFFSET_TIME_ORIGINAL};
    use serde_json::json;

    #[test]
    fn grouped_object_becomes_string_map() {
        let value = json!({
            "SourceFile": "/photos/IMG_0001.JPG",
            "EXIF:DateTimeOriginal": "2022:05:08 12:00:26",
            "EXIF:OffsetTimeOriginal": "+09:00",
            "EXIF:ISO": 200,
            "File:FileModifyDate": "2024:09:03 15:15:57+09:00",
            "XMP:Subject": ["a", "b"]
        });

        let metadata = to_metadata_map(&value).expect("object should convert");
        assert_eq!(
            metadata.get(DATE_TIME_ORIGINAL).map(String::as_str),
            Some("2022:05:08 12:00:26")
        );
        assert_eq!(
            metadata.get(OFFSET_TIME_ORIGINAL).map(String::as_str),
            Some("+09:00")
        );
        assert_eq!(
            metadata.get(FILE_MODIFY_DATE).map(String::as_str),
            Some("2024:09:03 15:15:57+09:00")
        );
        assert_eq!(metadata.get("EXIF:ISO").map(String::as_str), Some("200"));
        assert!(!metadata.contains_key("SourceFile"));
        assert!(!metadata.contains_key("XMP:Subject"));
    }

    #[test]
    fn array_output_uses_first_record() {
        let value = json!([
            { "File:FileModifyDate": "2024:09:03 15:15:57+09:00" },
            { "File:FileModifyDate": "1999:01:01 00:00:00+00:00" }
        ]);

        let metadata = to_metadata_map(&value).expect("array should convert");
        assert_eq!(
            metadata.get(FILE_MODIFY_DATE).map(String::as_str),
            Some("2024:09:03 15:15:57+09:00")
        );
    }

    #[test]
    fn record_without_tags_is_an_error() {
        assert!(to_metadata_map(&json!({ "SourceFile": "x.jpg" })).is_err());
        assert!(to_metadata_map(&json!("not an object")).is_err());
        assert!(to_metadata_map(&json!([])).is_err());
    }
}
