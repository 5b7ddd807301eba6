//! Global instructions (CLAUDE.md) merge
//!
//! Append-or-skip over a free-text document. The bundled template carries a
//! versioned marker tag; once a destination contains the tag it is considered
//! configured and left alone on subsequent runs.

use std::fs;
use std::path::Path;

/// Versioned tag identifying a managed instructions section. Detection is a
/// substring search, so the tag must never be reworded without a version
/// bump.
pub const MARKER: &str = "<!-- ccsetup:managed v1 -->";

/// What the merge did with the destination document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionsOutcome {
    /// Destination did not exist; source copied verbatim.
    Installed,
    /// Destination existed without the marker; source appended.
    Appended,
    /// Destination already carries the marker; nothing written.
    AlreadyConfigured,
    /// Force mode replaced an existing destination with the source.
    Overwritten,
}

/// Merge the bundled instructions at `source` into `dest`.
///
/// Three states: absent (copy), present without marker (append after two
/// newline separators), present with marker (no-op). `force` short-circuits
/// to overwrite regardless of state.
pub fn merge_instructions(
    dest: &Path,
    source: &Path,
    force: bool,
) -> Result<InstructionsOutcome, String> {
    let content = fs::read_to_string(source)
        .map_err(|e| format!("Could not read {}: {}", source.display(), e))?;

    let dest_exists = dest.exists();
    if force || !dest_exists {
        fs::write(dest, &content)
            .map_err(|e| format!("Could not write {}: {}", dest.display(), e))?;
        return Ok(if dest_exists {
            InstructionsOutcome::Overwritten
        } else {
            InstructionsOutcome::Installed
        });
    }

    let existing = fs::read_to_string(dest)
        .map_err(|e| format!("Could not read {}: {}", dest.display(), e))?;
    if existing.contains(MARKER) {
        return Ok(InstructionsOutcome::AlreadyConfigured);
    }

    let updated = format!("{}\n\n{}", existing, content);
    fs::write(dest, updated)
        .map_err(|e| format!("Could not write {}: {}", dest.display(), e))?;
    Ok(InstructionsOutcome::Appended)
}
