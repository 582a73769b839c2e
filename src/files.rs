use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{CertError, Result};

/// Mode of every file this crate writes (rw-r--r--).
pub const OUTPUT_MODE: u32 = 0o644;

pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CertError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates or truncates `path` and writes `contents` to it.
///
/// New files get [`OUTPUT_MODE`]; the mode of an existing file is left alone.
pub fn write_output(path: &Path, contents: &[u8], kind: &'static str) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(OUTPUT_MODE);
    }
    options
        .open(path)
        .and_then(|mut file| file.write_all(contents))
        .map_err(|source| CertError::WriteFile {
            kind,
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.crt");
        write_output(&path, b"one", "certificate").unwrap();
        write_output(&path, b"two", "certificate").unwrap();
        assert_eq!(read_input(&path).unwrap(), b"two");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_files_are_0644() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.key");
        write_output(&path, b"key", "private key").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        // the process umask can only remove bits
        assert_eq!(mode & !OUTPUT_MODE, 0);
        assert_ne!(mode & 0o600, 0);
    }

    #[test]
    fn test_missing_input_names_the_path() {
        let err = read_input(Path::new("/nonexistent/ca.crt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/ca.crt"));
    }
}
