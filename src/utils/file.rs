//! Helpers for naming, filtering and serving uploaded image files.

use std::path::{Component, Path};

use uuid::Uuid;

/// Extensions accepted for product images.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Resolves the extension of an upload from its content type, falling back to
/// the extension of the client supplied file name.
///
/// Returns `None` when neither yields an allowed image extension.
pub fn image_extension(content_type: Option<&str>, file_name: Option<&str>) -> Option<String> {
    let from_mime = content_type
        .and_then(|ct| ct.split(';').next())
        .and_then(|ct| ct.trim().split_once('/'))
        .filter(|(kind, _)| kind.eq_ignore_ascii_case("image"))
        .map(|(_, sub)| sub.to_ascii_lowercase());

    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    from_mime
        .into_iter()
        .chain(from_name)
        .find(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Generates the stored name for an upload: `<uuid-v4>.<ext>`.
pub fn generate_file_name(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extension)
}

/// Whether `name` is a single plain path component (no separators, no `..`).
pub fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Content type served for a stored image, derived from its extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
