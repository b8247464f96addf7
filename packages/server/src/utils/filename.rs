use std::path::Path;

/// Stem used when a title has no usable characters.
const FALLBACK_STEM: &str = "receta";

/// Extension used when neither the upload name nor its content type gives one.
const FALLBACK_EXTENSION: &str = "bin";

const MAX_STEM_CHARS: usize = 100;
const MAX_EXTENSION_CHARS: usize = 8;

/// Derives the stored file name for a recipe image: `<stem>_<id>.<ext>`.
///
/// The stem comes from the title (see [`title_stem`]); the extension from the
/// uploaded file name, falling back to the part's content type.
pub fn image_file_name(
    title: &str,
    recipe_id: i32,
    original_name: Option<&str>,
    content_type: Option<&str>,
) -> String {
    let ext = original_name
        .and_then(extension_from_name)
        .or_else(|| content_type.and_then(extension_from_mime))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    format!("{}_{}.{}", title_stem(title), recipe_id, ext)
}

/// Turns a title into a single safe path component.
///
/// Spaces become underscores; anything other than alphanumerics, `_` and `-`
/// is dropped, which removes path separators and dots.
pub fn title_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-'))
        .take(MAX_STEM_CHARS)
        .collect();

    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

fn extension_from_name(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    sanitize_extension(ext)
}

fn extension_from_mime(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim();
    let ext = mime_guess::get_mime_extensions_str(essence)?.first()?;
    sanitize_extension(ext)
}

fn sanitize_extension(ext: &str) -> Option<String> {
    let ext = ext.to_ascii_lowercase();
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_CHARS
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(ext)
}

/// Public URL path of a stored image, e.g. `/static/Tarta_1.png`.
pub fn image_url(url_prefix: &str, file_name: &str) -> String {
    format!("{}/{}", url_prefix.trim_end_matches('/'), file_name)
}

/// Inverse of [`image_url`]: the stored file name, if `url` points into the
/// image directory.
pub fn file_name_from_url<'a>(url_prefix: &str, url: &'a str) -> Option<&'a str> {
    let name = url
        .strip_prefix(url_prefix.trim_end_matches('/'))?
        .strip_prefix('/')?;

    if name.is_empty() || name.contains('/') {
        None
    } else {
        Some(name)
    }
}
