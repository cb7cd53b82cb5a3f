//! Requirement catalog: the static staffing needs of one week.
//!
//! The catalog is read-only to the scheduler. It is either the built-in
//! [`RequirementCatalog::default_week`] or a JSON file of the form
//!
//! ```json
//! { "shiftRequirements": [ { "shift": "day", "dayOfWeek": "Monday", "nursesRequired": 2 } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::day::DayOfWeek;
use crate::domain::{ShiftRequirement, ShiftType};
use crate::error::Result;

/// Nurses required on a day shift in the built-in week.
const DEFAULT_DAY_NURSES: u32 = 3;

/// Nurses required on a night shift in the built-in week.
const DEFAULT_NIGHT_NURSES: u32 = 2;

/// Supplies the week's staffing requirements.
pub trait RequirementSource: Send + Sync {
    fn list_shift_requirements(&self) -> Result<Vec<ShiftRequirement>>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    shift_requirements: Vec<ShiftRequirement>,
}

/// Fixed list of requirements held in memory.
#[derive(Debug, Clone, Default)]
pub struct RequirementCatalog {
    requirements: Vec<ShiftRequirement>,
}

impl RequirementCatalog {
    pub fn new(requirements: Vec<ShiftRequirement>) -> Self {
        Self { requirements }
    }

    /// One day and one night requirement for every weekday, Monday first.
    pub fn default_week() -> Self {
        let requirements = DayOfWeek::ALL
            .iter()
            .cycle()
            .skip(1)
            .take(7)
            .flat_map(|&day| {
                [
                    ShiftRequirement::new(ShiftType::Day, day, DEFAULT_DAY_NURSES),
                    ShiftRequirement::new(ShiftType::Night, day, DEFAULT_NIGHT_NURSES),
                ]
            })
            .collect();
        Self { requirements }
    }

    /// Parses a catalog from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::new(file.shift_requirements))
    }

    /// Loads a catalog from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let catalog = Self::from_json(&contents)?;
        info!(
            path = %path.display(),
            requirements = catalog.requirements.len(),
            "Loaded requirement catalog"
        );
        Ok(catalog)
    }

    pub fn requirements(&self) -> &[ShiftRequirement] {
        &self.requirements
    }
}

impl RequirementSource for RequirementCatalog {
    fn list_shift_requirements(&self) -> Result<Vec<ShiftRequirement>> {
        Ok(self.requirements.clone())
    }
}
