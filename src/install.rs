//! Recursive asset tree installation
//!
//! Copies a bundled source directory onto the destination tree. Directory
//! structure is mirrored exactly; existing destination files are skipped
//! unless overwrite is requested. The installer only ever adds or overwrites,
//! it never deletes.

use crate::bundle::display_path;
use colored::Colorize;
use std::fs;
use std::path::Path;

/// Tally of what one category install did.
#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: usize,
    pub skipped: usize,
}

/// Install `source` onto `dest`. A missing `source` is a silent no-op: asset
/// categories are optional. A filesystem error aborts the category; files
/// already written stay in place.
pub fn install_tree(source: &Path, dest: &Path, overwrite: bool) -> Result<InstallReport, String> {
    let mut report = InstallReport::default();
    if !source.exists() {
        return Ok(report);
    }
    copy_recursive(source, dest, overwrite, &mut report)?;
    Ok(report)
}

fn copy_recursive(
    source: &Path,
    dest: &Path,
    overwrite: bool,
    report: &mut InstallReport,
) -> Result<(), String> {
    let meta = fs::metadata(source)
        .map_err(|e| format!("Could not read {}: {}", source.display(), e))?;

    if meta.is_dir() {
        ensure_dir(dest)?;
        let entries = fs::read_dir(source)
            .map_err(|e| format!("Could not read {}: {}", source.display(), e))?;
        for entry in entries {
            let entry =
                entry.map_err(|e| format!("Could not read {}: {}", source.display(), e))?;
            copy_recursive(
                &entry.path(),
                &dest.join(entry.file_name()),
                overwrite,
                report,
            )?;
        }
    } else {
        if dest.exists() && !overwrite {
            println!(
                "   {} {} (already exists)",
                "Skipping".yellow(),
                display_path(dest)
            );
            report.skipped += 1;
            return Ok(());
        }
        fs::copy(source, dest)
            .map_err(|e| format!("Could not write {}: {}", dest.display(), e))?;
        println!("   {} {}", "Installed".green(), display_path(dest));
        report.installed += 1;
    }

    Ok(())
}

/// Create `path` and any missing ancestors.
pub fn ensure_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| format!("Could not create {}: {}", path.display(), e))?;
        println!("   {} {}", "Creating".green(), display_path(path));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_install_mirrors_nested_tree() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        write(&src.join("a.md"), "a");
        write(&src.join("sub/deep/b.md"), "b");

        let report = install_tree(&src, &dest, false).unwrap();

        assert_eq!(report.installed, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(fs::read_to_string(dest.join("a.md")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dest.join("sub/deep/b.md")).unwrap(), "b");
    }

    #[test]
    fn test_existing_file_skipped_without_overwrite() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        write(&src.join("a.md"), "theirs");
        write(&dest.join("a.md"), "mine");

        let report = install_tree(&src, &dest, false).unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(fs::read_to_string(dest.join("a.md")).unwrap(), "mine");
    }

    #[test]
    fn test_existing_file_replaced_with_overwrite() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        write(&src.join("a.md"), "theirs");
        write(&dest.join("a.md"), "mine");

        let report = install_tree(&src, &dest, true).unwrap();

        assert_eq!(report.installed, 1);
        assert_eq!(fs::read_to_string(dest.join("a.md")).unwrap(), "theirs");
    }

    #[test]
    fn test_missing_source_is_silent_noop() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("dest");

        let report = install_tree(&dir.path().join("absent"), &dest, false).unwrap();

        assert_eq!(report.installed, 0);
        assert_eq!(report.skipped, 0);
        assert!(!dest.exists());
    }

    #[test]
    fn test_reinstall_skips_everything() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        write(&src.join("a.md"), "a");
        write(&src.join("sub/b.md"), "b");

        install_tree(&src, &dest, false).unwrap();
        let report = install_tree(&src, &dest, false).unwrap();

        assert_eq!(report.installed, 0);
        assert_eq!(report.skipped, 2);
    }
}
