//! UUID utilities

use uuid::Uuid;

/// Build a collision-free storage key for an uploaded file.
///
/// The key is a fresh UUIDv4, suffixed with the original file's extension when
/// that extension is short plain ASCII alphanumerics (lowercased). Anything
/// else in the original name is dropped.
pub fn storage_key(original_file_name: &str) -> String {
    let id = Uuid::new_v4();
    match extension_of(original_file_name) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > 10 {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
