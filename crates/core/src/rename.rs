use crate::config::CollisionPolicy;
use crate::metadata::MetadataProvider;
use crate::time::photo_time;
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const PHOTO_EXTENSIONS: &[&str] = &["heic", "jpeg", "jpg", "png"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameStatus {
    Renamed { new_name: String },
    Unchanged,
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub original_path: PathBuf,
    pub original_name: String,
    pub status: RenameStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameStats {
    pub scanned_files: usize,
    pub photo_files: usize,
    pub skipped_non_photo: usize,
    pub renamed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RenameReport {
    pub outcomes: Vec<FileOutcome>,
    pub stats: RenameStats,
}

impl RenameReport {
    pub fn has_failures(&self) -> bool {
        self.stats.failed > 0
    }
}

pub fn rename_directory(
    dir: &Path,
    provider: &mut dyn MetadataProvider,
    policy: CollisionPolicy,
) -> Result<RenameReport> {
    let mut stats = RenameStats::default();
    let files = collect_photo_files(dir, &mut stats)?;
    Ok(rename_files(files, stats, provider, policy))
}

pub fn rename_files(
    files: Vec<PathBuf>,
    mut stats: RenameStats,
    provider: &mut dyn MetadataProvider,
    policy: CollisionPolicy,
) -> RenameReport {
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let original_name = display_name(&path);
        let status = match rename_photo(&path, provider, policy) {
            Ok(Some(target)) => {
                let new_name = display_name(&target);
                info!("{} -> {}", path.display(), new_name);
                stats.renamed += 1;
                RenameStatus::Renamed { new_name }
            }
            Ok(None) => {
                debug!("変更なし: {}", path.display());
                stats.unchanged += 1;
                RenameStatus::Unchanged
            }
            Err(err) => {
                let message = format!("{err:#}");
                warn!("リネーム失敗: {}: {message}", path.display());
                stats.failed += 1;
                RenameStatus::Failed { message }
            }
        };

        outcomes.push(FileOutcome {
            original_path: path,
            original_name,
            status,
        });
    }

    RenameReport { outcomes, stats }
}

pub fn collect_photo_files(dir: &Path, stats: &mut RenameStats) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("フォルダを読めませんでした: {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("エントリ読み取り失敗: {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        stats.scanned_files += 1;
        if is_photo(&path) {
            stats.photo_files += 1;
            out.push(path);
        } else {
            stats.skipped_non_photo += 1;
        }
    }
    out.sort();

    Ok(out)
}

pub fn is_photo(path: &Path) -> bool {
    lowercase_extension(path)
        .map(|ext| PHOTO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn rename_photo(
    path: &Path,
    provider: &mut dyn MetadataProvider,
    policy: CollisionPolicy,
) -> Result<Option<PathBuf>> {
    let metadata = provider.read_metadata(path)?;
    let time = photo_time(&metadata)?;
    debug!("{}: {time}", path.display());

    let extension = lowercase_extension(path)
        .with_context(|| format!("拡張子がありません: {}", path.display()))?;
    let target = resolve_target(path, &time, &extension, policy)?;
    if target == path {
        return Ok(None);
    }

    fs::rename(path, &target).with_context(|| {
        format!(
            "リネームに失敗しました: {} -> {}",
            path.display(),
            target.display()
        )
    })?;
    Ok(Some(target))
}

fn resolve_target(
    original_path: &Path,
    base: &str,
    extension: &str,
    policy: CollisionPolicy,
) -> Result<PathBuf> {
    let parent = original_path
        .parent()
        .context("親ディレクトリを取得できませんでした")?;

    let candidate = parent.join(format!("{}.{}", base, extension));
    if is_available(&candidate, original_path) {
        return Ok(candidate);
    }

    match policy {
        CollisionPolicy::Fail => {
            bail!("リネーム先が既に存在します: {}", display_name(&candidate))
        }
        CollisionPolicy::Suffix => {
            let mut n = 1usize;
            loop {
                let candidate = parent.join(format!("{}_{:03}.{}", base, n, extension));
                if is_available(&candidate, original_path) {
                    return Ok(candidate);
                }
                n += 1;
            }
        }
    }
}

fn is_available(candidate: &Path, original_path: &Path) -> bool {
    if candidate == original_path {
        return true;
    }
    // A case-insensitive filesystem reports the original itself as the target.
    if differs_only_in_case(candidate, original_path) {
        return !listed_in_parent(candidate);
    }
    !candidate.exists()
}

fn differs_only_in_case(a: &Path, b: &Path) -> bool {
    a.parent() == b.parent()
        && match (a.file_name(), b.file_name()) {
            (Some(a), Some(b)) => a.to_string_lossy().eq_ignore_ascii_case(&b.to_string_lossy()),
            _ => false,
        }
}

fn listed_in_parent(path: &Path) -> bool {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return false;
    };
    fs::read_dir(parent)
        .map(|entries| {
            entries
                .flatten()
                .any(|entry| entry.file_name().as_os_str() == name)
        })
        .unwrap_or(false)
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
