use std::path::Path;

/// Retrieve the language suffix from the subtitle filename, e.g. `en` for `movie.en.srt`.
///
/// Only the filename is inspected, dots within the parent directories are ignored.
pub fn language_from_filename<P: AsRef<Path>>(path: P) -> Option<String> {
    let filename = path.as_ref().file_name()?.to_str()?;
    let (name, _extension) = filename.rsplit_once('.')?;
    let (_, language) = name.rsplit_once('.')?;

    if language.is_empty() {
        None
    } else {
        Some(language.to_string())
    }
}
