//! Image files → base64 data URLs.
//!
//! QR codes and payment proofs travel as `data:<mime>;base64,<payload>`
//! strings; this module turns a user-supplied path into one.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Upper bound on an encoded upload.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Normalizes user-provided file paths.
///
/// Handles drag-and-drop shell escaping (`\ `, `\(`, `\)`) and expands `~/`
/// to the home directory when available.
#[must_use]
pub fn normalize_input_path(path: &str) -> PathBuf {
    let unescaped = path
        .trim()
        .replace("\\ ", " ")
        .replace("\\(", "(")
        .replace("\\)", ")");

    if let Some(rest) = unescaped.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }

    PathBuf::from(unescaped)
}

/// MIME type inferred from the file extension, for accepted image formats.
#[must_use]
pub fn mime_type_for_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(|e| e.to_str())?;

    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Sniffs the image type from magic bytes.
fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    let kind = infer::get(bytes)?;
    (kind.matcher_type() == infer::MatcherType::Image).then(|| kind.mime_type())
}

/// Encodes raw image bytes as a data URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Reads an image file and returns it as a data URL.
///
/// The file content decides the MIME type; the extension is only a fallback
/// for formats `infer` does not recognize.
///
/// # Errors
/// Returns an error if the file cannot be read, is too large, or is not an
/// image.
pub fn image_data_url(path: &str) -> Result<String> {
    let path = normalize_input_path(path);
    let meta = fs::metadata(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if meta.len() > MAX_IMAGE_BYTES {
        bail!(
            "{} is too large ({} bytes, limit {MAX_IMAGE_BYTES})",
            path.display(),
            meta.len()
        );
    }

    let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mime = sniff_image_mime(&bytes)
        .or_else(|| mime_type_for_extension(&path))
        .with_context(|| format!("{} is not a supported image", path.display()))?;

    tracing::debug!(path = %path.display(), mime, bytes = bytes.len(), "encoded image");
    Ok(to_data_url(mime, &bytes))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn test_normalize_unescapes_shell_sequences() {
        assert_eq!(
            normalize_input_path("/tmp/my\\ proof\\ \\(1\\).png"),
            PathBuf::from("/tmp/my proof (1).png")
        );
    }

    #[test]
    fn test_extension_mime() {
        assert_eq!(mime_type_for_extension(Path::new("a.JPG")), Some("image/jpeg"));
        assert_eq!(mime_type_for_extension(Path::new("a.pdf")), None);
        assert_eq!(mime_type_for_extension(Path::new("noext")), None);
    }

    #[test]
    fn test_png_is_encoded_from_content() {
        let dir = tempdir().unwrap();
        // wrong extension on purpose: content wins
        let path = dir.path().join("qr.jpg");
        fs::write(&path, PNG_HEADER).unwrap();

        let url = image_data_url(path.to_str().unwrap()).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let payload = url.trim_start_matches("data:image/png;base64,");
        assert_eq!(STANDARD.decode(payload).unwrap(), PNG_HEADER);
    }

    #[test]
    fn test_non_image_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let err = image_data_url(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("not a supported image"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = image_data_url("/definitely/not/here.png").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
