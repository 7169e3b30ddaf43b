use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CascadeResolveError {
    #[error("cascade file not found: {0}")]
    Missing(PathBuf),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("download failed for {url}: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to write cascade to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("failed to load cascade classifier from {path}: {reason}")]
    Load { path: PathBuf, reason: String },
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Locate a Haar cascade XML file.
///
/// Resolution order:
/// 1. `explicit` path, which must exist when given
/// 2. User cache directory
/// 3. `search_dirs` (system OpenCV data directories)
/// 4. Download from `url` into the cache
pub fn resolve(
    name: &str,
    explicit: Option<&Path>,
    search_dirs: &[PathBuf],
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, CascadeResolveError> {
    let cache_dir = cascade_cache_dir()?;
    resolve_with_cache(name, explicit, &cache_dir, search_dirs, url, progress)
}

fn resolve_with_cache(
    name: &str,
    explicit: Option<&Path>,
    cache_dir: &Path,
    search_dirs: &[PathBuf],
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, CascadeResolveError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(CascadeResolveError::Missing(path.to_path_buf()))
        };
    }

    let cached_path = cache_dir.join(name);
    if cached_path.is_file() {
        return Ok(cached_path);
    }

    if let Some(found) = search_dirs
        .iter()
        .map(|dir| dir.join(name))
        .find(|p| p.is_file())
    {
        return Ok(found);
    }

    log::info!("Cascade {name} not installed locally, downloading");
    fs::create_dir_all(cache_dir).map_err(CascadeResolveError::CacheDir)?;
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Standard OpenCV data directories as owned paths.
pub fn default_search_dirs() -> Vec<PathBuf> {
    crate::shared::constants::CASCADE_SEARCH_DIRS
        .iter()
        .map(PathBuf::from)
        .collect()
}

/// Platform-specific cascade cache directory.
///
/// - macOS: `~/Library/Application Support/FaceSampler/cascades/`
/// - Linux: `$XDG_CACHE_HOME/FaceSampler/cascades/` or `~/.cache/FaceSampler/cascades/`
/// - Windows: `%LOCALAPPDATA%/FaceSampler/cascades/`
pub fn cascade_cache_dir() -> Result<PathBuf, CascadeResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("FaceSampler").join("cascades"))
            .ok_or(CascadeResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("FaceSampler").join("cascades"))
            .ok_or(CascadeResolveError::NoCacheDir)
    }
}

fn download(
    url: &str,
    dest: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), CascadeResolveError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| match e.status() {
            Some(status) => CascadeResolveError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            },
            None => CascadeResolveError::Download {
                url: url.to_string(),
                source: e,
            },
        })?;

    let total = response.content_length().unwrap_or(0);
    store(response, total, dest, progress)
}

/// Streams `body` into `<dest>.part` and renames it over `dest`.
///
/// The `.part` file is removed if any step fails.
fn store(
    body: impl Read,
    total: u64,
    dest: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), CascadeResolveError> {
    let temp_path = dest.with_extension("part");

    let result = store_inner(body, total, dest, &temp_path, progress);

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn store_inner(
    mut body: impl Read,
    total: u64,
    dest: &Path,
    temp_path: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), CascadeResolveError> {
    let write_err = |e| CascadeResolveError::Write {
        path: temp_path.to_path_buf(),
        source: e,
    };
    let mut file = fs::File::create(temp_path).map_err(write_err)?;

    let mut downloaded: u64 = 0;
    let mut buf = vec![0u8; 256 * 1024];
    loop {
        let n = body.read(&mut buf).map_err(write_err)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_err)?;
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(write_err)?;
    drop(file);

    fs::rename(temp_path, dest).map_err(|e| CascadeResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })
}
