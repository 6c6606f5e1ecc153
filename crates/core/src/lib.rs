mod config;
mod exif_reader;
mod exiftool_reader;
mod extract;
mod format;
mod metadata;
mod offset;
mod rename;
mod time;

pub use config::{
    config_path, load_config, load_config_from, AppConfig, CollisionPolicy, ProviderKind,
    CONFIG_ENV,
};
pub use exif_reader::NativeExifProvider;
pub use exiftool_reader::ExifToolProvider;
pub use extract::{date_time, offset_time};
pub use format::{format_canonical, INPUT_FORMATS, OUTPUT_FORMAT};
pub use metadata::{
    open_provider, MetadataMap, MetadataProvider, DATE_TIME_ORIGINAL, FILE_MODIFY_DATE,
    OFFSET_TIME_ORIGINAL,
};
pub use offset::{has_offset, with_offset};
pub use rename::{
    collect_photo_files, is_photo, rename_directory, rename_files, FileOutcome, RenameReport,
    RenameStats, RenameStatus, PHOTO_EXTENSIONS,
};
pub use time::{photo_time, TimeError};
