use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use equalizer_workflow::Workflow;

/// Write the equalized contract to `path`, or to the default file name in the
/// current directory.
pub fn write_export(wf: &Workflow, path: Option<&Path>) -> anyhow::Result<PathBuf> {
    let Some(export) = wf.export() else {
        bail!("nothing to export yet: equalize the contract first");
    };
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(export.filename));
    std::fs::write(&path, export.text)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_requires_analysis() {
        let mut wf = Workflow::default();
        wf.ingest_text("terms.txt", "1. Payment net 90.");
        let tmp = tempfile::TempDir::new().unwrap();
        let err = write_export(&wf, Some(&tmp.path().join("out.txt"))).unwrap_err();
        assert!(err.to_string().contains("equalize the contract first"));
        assert!(!tmp.path().join("out.txt").exists());
    }
}
