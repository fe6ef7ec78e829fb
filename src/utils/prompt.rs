//! Interactive prompting for the development directory.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Asks for the main development directory.
///
/// Returns `None` when the user enters nothing or input is closed. A leading
/// `~/` is expanded to the home directory.
pub fn prompt_for_directory<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
) -> Result<Option<PathBuf>> {
    write!(writer, "Please enter the main development directory: ")
        .context("Failed to write prompt")?;
    writer.flush().context("Failed to flush prompt")?;

    let mut input = String::new();
    let read = reader
        .read_line(&mut input)
        .context("Failed to read directory from input")?;

    let input = input.trim();
    if read == 0 || input.is_empty() {
        return Ok(None);
    }

    Ok(Some(expand_tilde(
        Path::new(input),
        dirs::home_dir().as_deref(),
    )))
}

/// Expands a leading `~` component against `home`. Other paths are returned
/// unchanged, byte for byte.
pub fn expand_tilde(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) if rest.as_os_str().is_empty() => home.to_path_buf(),
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_trimmed_directory() {
        let mut input = Cursor::new("  /srv/code  \n");
        let mut output = Vec::new();

        let dir = prompt_for_directory(&mut input, &mut output).unwrap();

        assert_eq!(dir, Some(PathBuf::from("/srv/code")));
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Please enter the main development directory: "
        );
    }

    #[test]
    fn empty_or_closed_input_is_none() {
        let mut output = Vec::new();
        assert_eq!(
            prompt_for_directory(&mut Cursor::new("\n"), &mut output).unwrap(),
            None
        );
        assert_eq!(
            prompt_for_directory(&mut Cursor::new(""), &mut output).unwrap(),
            None
        );
    }

    #[test]
    fn expand_tilde_uses_home() {
        let home = Path::new("/home/dev");
        let expand = |p: &str, home| expand_tilde(Path::new(p), home);

        assert_eq!(expand("~/src", Some(home)), PathBuf::from("/home/dev/src"));
        assert_eq!(expand("~", Some(home)), PathBuf::from("/home/dev"));
        assert_eq!(expand("/abs/path", Some(home)), PathBuf::from("/abs/path"));
        assert_eq!(expand("~/src", None), PathBuf::from("~/src"));
        assert_eq!(expand("~user/src", Some(home)), PathBuf::from("~user/src"));
    }

    #[cfg(unix)]
    #[test]
    fn expand_tilde_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let home = Path::new("/home/dev");
        let raw = Path::new(OsStr::from_bytes(b"~/caf\xe9"));
        let plain = Path::new(OsStr::from_bytes(b"/srv/caf\xe9"));

        assert_eq!(
            expand_tilde(raw, Some(home)).as_os_str().as_bytes(),
            b"/home/dev/caf\xe9"
        );
        assert_eq!(expand_tilde(plain, Some(home)), plain);
    }
}
