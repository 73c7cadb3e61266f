//! Reading single entries out of zip-format archives (jars).

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::{retrieval_err, SyncError};

/// Path of the extension metadata inside an extension jar.
pub const EXTENSION_ENTRY: &str = "META-INF/quarkus-extension.yaml";

/// Return the bytes of `entry` from the zip archive in `archive`.
///
/// `origin` is the URL the archive came from and is only used to give
/// errors context.
pub fn read_entry(archive: &[u8], entry: &str, origin: &str) -> Result<Vec<u8>, SyncError> {
    let context = || format!("{origin}!/{entry}");

    let mut zip =
        ZipArchive::new(Cursor::new(archive)).map_err(|e| retrieval_err(context(), e))?;
    let mut file = zip.by_name(entry).map_err(|e| retrieval_err(context(), e))?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| retrieval_err(context(), e))?;
    Ok(bytes)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;

    /// Build an in-memory jar holding the given `(path, content)` entries.
    pub(crate) fn jar(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (path, content) in entries {
            writer.start_file(*path, options).expect("start_file");
            writer.write_all(content.as_bytes()).expect("write entry");
        }
        writer.finish().expect("finish").into_inner()
    }

    #[test]
    fn reads_named_entry() {
        let bytes = jar(&[
            ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n"),
            (EXTENSION_ENTRY, "name: Acme\n"),
        ]);
        let entry = read_entry(&bytes, EXTENSION_ENTRY, "https://repo/acme.jar").expect("entry");
        assert_eq!(entry, b"name: Acme\n");
    }

    #[test]
    fn missing_entry_is_retrieval_error() {
        let bytes = jar(&[("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n")]);
        let err = read_entry(&bytes, EXTENSION_ENTRY, "https://repo/acme.jar").unwrap_err();
        assert!(matches!(err, SyncError::Retrieval { .. }), "got: {err}");
        assert!(err.to_string().contains("acme.jar!/META-INF/quarkus-extension.yaml"));
    }

    #[test]
    fn garbage_is_retrieval_error() {
        let err = read_entry(b"not a zip", EXTENSION_ENTRY, "x.jar").unwrap_err();
        assert!(matches!(err, SyncError::Retrieval { .. }));
    }
}
