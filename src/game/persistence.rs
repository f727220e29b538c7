//! # Inventory Persistence
//!
//! Saves the gem inventory as plain text, one `power;quantity` record per
//! line in pre-order. Reloading the records in file order rebuilds the exact
//! same tree shape.

use crate::config::SAVE_FILE_NAME;
use crate::game::Inventory;
use crate::{ThicketError, ThicketResult};
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Serializes an inventory into its pre-order text form.
pub fn to_records(inventory: &Inventory) -> String {
    inventory
        .preorder()
        .into_iter()
        .map(|record| record + "\n")
        .collect()
}

/// Parses pre-order text records. Blank lines are skipped.
///
/// Any record that is not exactly two integers separated by `;`, or that
/// carries a zero quantity, rejects the whole document. So do repeated
/// powers whose quantities sum past `u32::MAX`.
///
/// # Examples
///
/// ```
/// use thicket::parse_records;
///
/// let records = parse_records("10;3\n\n5;1\n").unwrap();
/// assert_eq!(records, vec![(10, 3), (5, 1)]);
/// assert!(parse_records("10;x\n").is_err());
/// ```
pub fn parse_records(text: &str) -> ThicketResult<Vec<(i32, u32)>> {
    let mut records = Vec::new();
    let mut totals: BTreeMap<i32, u32> = BTreeMap::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let malformed = || ThicketError::MalformedSave {
            line: index + 1,
            content: line.to_string(),
        };

        let mut fields = line.split(';');
        let (Some(power), Some(quantity), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(malformed());
        };
        let power: i32 = power.trim().parse().map_err(|_| malformed())?;
        let quantity: u32 = quantity.trim().parse().map_err(|_| malformed())?;
        if quantity == 0 {
            return Err(malformed());
        }
        let total = totals.entry(power).or_insert(0);
        *total = total.checked_add(quantity).ok_or_else(malformed)?;
        records.push((power, quantity));
    }
    Ok(records)
}

/// File-backed store for the player's inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryStore {
    path: PathBuf,
}

impl InventoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/save_inventory.txt`.
    pub fn in_data_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SAVE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the inventory, creating the parent directory if needed.
    pub fn save(&self, inventory: &Inventory) -> ThicketResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, to_records(inventory))?;
        info!(
            "Saved {} gem kinds to {}",
            inventory.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Replaces the inventory's contents with the saved records.
    ///
    /// A missing file leaves the inventory empty. A malformed file also
    /// leaves it empty and reports [`ThicketError::MalformedSave`].
    pub fn load(&self, inventory: &mut Inventory) -> ThicketResult<()> {
        inventory.clear();

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No saved inventory at {}", self.path.display());
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let records = parse_records(&text).map_err(|err| {
            warn!("Rejected saved inventory {}: {}", self.path.display(), err);
            err
        })?;

        for (power, quantity) in records {
            inventory.insert(power, quantity);
        }
        info!(
            "Loaded {} gem kinds from {}",
            inventory.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Whether a non-empty save file exists.
    pub fn has_saved_inventory(&self) -> bool {
        fs::metadata(&self.path)
            .map(|metadata| metadata.is_file() && metadata.len() > 0)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Inventory {
        let mut inventory = Inventory::new();
        for (power, quantity) in [(15, 2), (5, 7), (30, 1), (10, 4)] {
            inventory.insert(power, quantity);
        }
        inventory
    }

    #[test]
    fn test_records_are_preorder() {
        assert_eq!(to_records(&sample()), "15;2\n5;7\n10;4\n30;1\n");
        assert_eq!(to_records(&Inventory::new()), "");
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        for bad in ["5", "5;1;2", "a;1", "5;-1", "5;0", ";"] {
            let err = parse_records(&format!("10;1\n{}\n", bad)).unwrap_err();
            match err {
                ThicketError::MalformedSave { line, content } => {
                    assert_eq!(line, 2);
                    assert_eq!(content, bad);
                }
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let records = parse_records("  20;3  \r\n\n\t\n-5 ; 2\n").unwrap();
        assert_eq!(records, vec![(20, 3), (-5, 2)]);
    }

    #[test]
    fn test_reparsed_records_rebuild_same_tree() {
        let original = sample();
        let mut rebuilt = Inventory::new();
        for (power, quantity) in parse_records(&to_records(&original)).unwrap() {
            rebuilt.insert(power, quantity);
        }
        assert_eq!(rebuilt, original);
    }
}
