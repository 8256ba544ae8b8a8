//! Human-readable terminal output.
//!
//! Colors come from `yansi`; the binary disables them globally for
//! `--no-color`, `NO_COLOR`, or when stdout is not a terminal.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::actions::{DeletionOutcome, DeletionSummary};
use crate::duplicates::{DuplicateMap, ScanSummary};

/// Width of the digest prefix shown in group headers.
const DIGEST_PREFIX: usize = 16;

/// Text listing of duplicate groups and the scan summary.
pub struct TextOutput<'a> {
    groups: &'a DuplicateMap,
    summary: &'a ScanSummary,
}

impl<'a> TextOutput<'a> {
    #[must_use]
    pub fn new(groups: &'a DuplicateMap, summary: &'a ScanSummary) -> Self {
        Self { groups, summary }
    }

    /// Write every group (keeper marked) and then the summary.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for (idx, group) in self.groups.values().enumerate() {
            let digest = group.digest.get(..DIGEST_PREFIX).unwrap_or(&group.digest);
            writeln!(
                writer,
                "{} {}  {} copies of {}",
                format!("Group {}", idx + 1).bold(),
                digest.dim(),
                group.len(),
                ByteSize::b(group.size()),
            )?;
            for (member, file) in group.files.iter().enumerate() {
                if member == 0 {
                    writeln!(writer, "  {} {}", "keep".green(), file.path.display())?;
                } else {
                    writeln!(writer, "  {} {}", "dup ".yellow(), file.path.display())?;
                }
            }
            writeln!(writer)?;
        }
        self.write_summary(&mut writer)
    }

    /// Write just the summary block.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_summary<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let s = self.summary;
        if self.groups.is_empty() {
            writeln!(writer, "{}", "No duplicates found.".green())?;
        } else {
            writeln!(
                writer,
                "Found {} duplicate file(s) in {} group(s); {} reclaimable.",
                s.duplicate_files.bold(),
                s.duplicate_groups.bold(),
                s.reclaimable_display().bold(),
            )?;
        }
        writeln!(
            writer,
            "Scanned {} file(s), hashed {} ({}) in {:.2?}.",
            s.total_files,
            s.hashed_files,
            s.bytes_hashed_display(),
            s.scan_duration,
        )?;
        if s.has_errors() {
            writeln!(
                writer,
                "{}",
                format!("Skipped {} unreadable file(s):", s.errors.len()).yellow()
            )?;
            for (path, message) in &s.errors {
                writeln!(writer, "  {}: {}", path.display(), message)?;
            }
        }
        Ok(())
    }
}

/// List the files a cleanup is about to delete.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_plan<W: Write>(
    planned: &[DeletionOutcome],
    permanent: bool,
    mut writer: W,
) -> io::Result<()> {
    let (pending, refused): (Vec<_>, Vec<_>) = planned.iter().partition(|o| o.error.is_none());
    let bytes: u64 = pending.iter().map(|o| o.size).sum();
    let action = if permanent {
        "permanently delete".red().bold().to_string()
    } else {
        "move to the trash".to_string()
    };
    writeln!(
        writer,
        "Will {} {} file(s), {}:",
        action,
        pending.len(),
        ByteSize::b(bytes)
    )?;
    for outcome in &pending {
        writeln!(writer, "  {}", outcome.path.display())?;
    }
    for outcome in refused {
        writeln!(
            writer,
            "  {} {} ({})",
            "refused".yellow(),
            outcome.path.display(),
            outcome.error.as_deref().unwrap_or_default()
        )?;
    }
    Ok(())
}

/// Report the result of every attempted deletion, then a one-line summary.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_outcomes<W: Write>(outcomes: &[DeletionOutcome], mut writer: W) -> io::Result<()> {
    for outcome in outcomes {
        match &outcome.error {
            None if outcome.success => {
                writeln!(writer, "  {} {}", "deleted".green(), outcome.path.display())?;
            }
            error => {
                writeln!(
                    writer,
                    "  {} {}: {}",
                    "failed ".red(),
                    outcome.path.display(),
                    error.as_deref().unwrap_or("not processed")
                )?;
            }
        }
    }
    let summary = DeletionSummary::from_outcomes(outcomes);
    if summary.all_succeeded() {
        writeln!(writer, "{}", summary.summary().green())
    } else {
        writeln!(writer, "{}", summary.summary().yellow())
    }
}
