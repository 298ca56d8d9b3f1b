//! Atomic artifact output
//!
//! The document is written to a temporary file next to the target and renamed
//! over it only after the serializer succeeded. On failure the temporary file
//! is dropped and any existing target is left as it was.

use modelgen_core::error::{Error, Result};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Write `target` through `fill`, replacing it atomically
pub fn write_atomically<F>(target: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let directory = target.parent().ok_or_else(|| {
        Error::invalid_input(format!("Artifact path has no directory: {}", target.display()))
    })?;

    let temp = tempfile::Builder::new()
        .prefix(".modelgen-")
        .suffix(".tmp")
        .tempfile_in(directory)?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        fill(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(target).map_err(|e| Error::Io(e.error))?;
    debug!("Wrote {}", target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_writes_and_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("OrdersDataContext.edmx");

        write_atomically(&target, |out| Ok(out.write_all(b"first")?)).unwrap();
        write_atomically(&target, |out| Ok(out.write_all(b"second")?)).unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
        assert_eq!(entries(dir.path()), vec!["OrdersDataContext.edmx"]);
    }

    #[test]
    fn test_failure_keeps_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("OrdersDataContext.edmx");
        std::fs::write(&target, "previous").unwrap();

        let result = write_atomically(&target, |out| {
            out.write_all(b"partial")?;
            Err(Error::serialization("rejected"))
        });

        assert!(matches!(result, Err(Error::Serialization(_))));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "previous");
        assert_eq!(entries(dir.path()), vec!["OrdersDataContext.edmx"]);
    }
}
