use crate::config::{AppConfig, ProviderKind};
use crate::exif_reader::NativeExifProvider;
use crate::exiftool_reader::ExifToolProvider;
use anyhow::Result;
use log::warn;
use std::collections::BTreeMap;
use std::path::Path;

pub type MetadataMap = BTreeMap<String, String>;

pub const DATE_TIME_ORIGINAL: &str = "EXIF:DateTimeOriginal";
pub const OFFSET_TIME_ORIGINAL: &str = "EXIF:OffsetTimeOriginal";
// Always carries an offset.
pub const FILE_MODIFY_DATE: &str = "File:FileModifyDate";

pub trait MetadataProvider {
    fn read_metadata(&mut self, path: &Path) -> Result<MetadataMap>;
}

pub fn open_provider(config: &AppConfig) -> Result<Box<dyn MetadataProvider>> {
    let exiftool_path = config.exiftool_path.as_deref();
    match config.provider {
        ProviderKind::Exiftool => Ok(Box::new(ExifToolProvider::new(exiftool_path)?)),
        ProviderKind::Native => Ok(Box::new(NativeExifProvider)),
        ProviderKind::Auto => match ExifToolProvider::new(exiftool_path) {
            Ok(provider) => Ok(Box::new(provider)),
            Err(err) => {
                warn!("exiftool unavailable, reading EXIF natively: {err:#}");
                Ok(Box::new(NativeExifProvider))
            }
        },
    }
}

pub(crate) fn non_blank<'a>(metadata: &'a MetadataMap, tag: &str) -> Option<&'a str> {
    metadata
        .get(tag)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}
