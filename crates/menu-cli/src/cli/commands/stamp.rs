//! `menu stamp <files>` – refresh restaurant.updatedAt.

use anyhow::Result;
use menu_core::stamp::{stamp_file, StampOutcome};
use std::path::PathBuf;

pub fn run_stamp(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        match stamp_file(path)? {
            StampOutcome::Updated(at) => println!("Updated: {} -> {at}", path.display()),
            StampOutcome::Unchanged => println!("No change: {}", path.display()),
            StampOutcome::Skipped => println!("Skipped (no restaurant): {}", path.display()),
        }
    }
    Ok(())
}
