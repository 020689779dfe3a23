//! URL list loading.

use std::io::ErrorKind;
use std::path::Path;

use log::info;

use crate::error_handling::ConfigError;

/// Reads the newline-delimited URL list at `path`.
///
/// Lines are trimmed; blank lines and `#` comments are skipped. Order and
/// duplicates are preserved, since every line becomes one result. A missing
/// file or a list with no URLs is a configuration error.
pub async fn load_urls(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::UrlsFileNotFound(path.to_path_buf()),
            _ => ConfigError::UrlsFileRead {
                path: path.to_path_buf(),
                source,
            },
        })?;

    let urls = parse_url_list(&content);
    if urls.is_empty() {
        return Err(ConfigError::NoUrls(path.to_path_buf()));
    }

    info!("Loaded {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}

/// Splits list content into URLs, skipping blank lines and comments.
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
