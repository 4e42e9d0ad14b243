//! Reading inputs from disk and writing results back
//!
//! Outputs are written with mode 0600 on Unix, synced, and moved into place
//! with a rename. Existing files are only replaced when `overwrite` is set.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::batch::InputFile;
use crate::error::{Result, SecureFilesError};

/// An input file together with where it was read from.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub input: InputFile,
}

/// Read `path` fully into memory, named by its final component.
pub fn read_source(path: &Path) -> Result<SourceFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            SecureFilesError::Other(format!("'{}' has no usable file name", path.display()))
        })?
        .to_string();

    let data = fs::read(path)?;

    Ok(SourceFile {
        path: path.to_path_buf(),
        input: InputFile::new(name, data),
    })
}

/// Where an output named `name` for `source` should be written.
pub fn output_path(source: &Path, name: &str, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.join(name),
        None => source
            .parent()
            .map(|p| p.join(name))
            .unwrap_or_else(|| PathBuf::from(name)),
    }
}

/// Write `data` to `path`.
///
/// The bytes go to a temporary file in the target directory first and are
/// renamed over `path` only after `sync_all`, so a failed write never
/// truncates an existing file.
///
/// # Errors
/// `OutputExists` if the file is already there and `overwrite` is false.
pub fn write_output(path: &Path, data: &[u8], overwrite: bool) -> Result<()> {
    replace_file(path, overwrite, |file| file.write_all(data))
}

fn replace_file<F>(path: &Path, overwrite: bool, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    if !overwrite && path.exists() {
        return Err(SecureFilesError::OutputExists(path.to_path_buf()));
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // NamedTempFile is created 0600 and removed on drop if never persisted.
    let mut temp = NamedTempFile::new_in(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file().set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    fill(temp.as_file_mut())?;
    temp.as_file().sync_all()?;

    let persisted = if overwrite {
        temp.persist(path)
    } else {
        temp.persist_noclobber(path)
    };

    persisted.map_err(|e| match e.error.kind() {
        ErrorKind::AlreadyExists => SecureFilesError::OutputExists(path.to_path_buf()),
        _ => SecureFilesError::Io(e.error),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_source_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hello").unwrap();

        let source = read_source(&path).unwrap();
        assert_eq!(source.input.name, "notes.txt");
        assert_eq!(source.input.data, b"hello");
        assert_eq!(source.path, path);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_source(&dir.path().join("missing"));
        assert!(matches!(result, Err(SecureFilesError::Io(_))));
    }

    #[test]
    fn test_output_path() {
        let source = Path::new("/data/photos/cat.jpg");
        assert_eq!(
            output_path(source, "cat.jpg.enc", None),
            PathBuf::from("/data/photos/cat.jpg.enc")
        );
        assert_eq!(
            output_path(source, "cat.jpg.enc", Some(Path::new("/vault"))),
            PathBuf::from("/vault/cat.jpg.enc")
        );
    }

    #[test]
    fn test_write_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.enc");

        write_output(&path, b"first", false).unwrap();
        let result = write_output(&path, b"second", false);

        assert!(matches!(result, Err(SecureFilesError::OutputExists(p)) if p == path));
        assert_eq!(fs::read(&path).unwrap(), b"first");
    }

    #[test]
    fn test_write_with_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.enc");

        write_output(&path, b"a much longer first payload", false).unwrap();
        write_output(&path, b"second", true).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_failed_write_keeps_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("only-copy.bin");
        fs::write(&path, b"ciphertext that must survive").unwrap();

        let result = replace_file(&path, true, |file| {
            file.write_all(b"partial plain")?;
            Err(io::Error::new(ErrorKind::Other, "No space left on device"))
        });

        assert!(matches!(result, Err(SecureFilesError::Io(_))));
        assert_eq!(fs::read(&path).unwrap(), b"ciphertext that must survive");

        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "temporary file was not cleaned up");
    }

    #[test]
    fn test_overwrite_of_source_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, b"blob").unwrap();

        write_output(&path, b"plain", true).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"plain");
    }

    #[cfg(unix)]
    #[test]
    fn test_output_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.enc");
        write_output(&path, b"x", false).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
