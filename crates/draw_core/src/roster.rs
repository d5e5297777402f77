//! Roster extraction
//!
//! Turns spreadsheet rows (column label → cell) into a flat list of
//! categorized individuals. Columns are recognised by a case-insensitive
//! substring match on their label, so `Male Employees`, `FEMALE` and
//! `Interns 2024` all classify.

use crate::config::CategoryMarkers;
use crate::error::{DrawError, Result};
use crate::models::{Category, CategoryCounts, Individual};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::{debug, info};

/// Scalar spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Trimmed text form of the cell
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{n:.0}"),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// One spreadsheet row, cells in column order
///
/// Deserializes from a JSON object and keeps the object's key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterRow {
    cells: Vec<(String, CellValue)>,
}

impl RosterRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell; a repeated label keeps its first column position
    pub fn insert(&mut self, label: String, value: CellValue) -> Option<CellValue> {
        match self.cells.iter_mut().find(|(l, _)| *l == label) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.cells.push((label, value));
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(l, _)| l == label).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(l, v)| (l.as_str(), v))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for RosterRow {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        let mut row = RosterRow::new();
        for (label, value) in iter {
            row.insert(label, value);
        }
        row
    }
}

impl Serialize for RosterRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (label, value) in &self.cells {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RosterRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = RosterRow;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of column label to scalar cell")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<RosterRow, A::Error> {
                let mut row = RosterRow::new();
                while let Some((label, value)) = access.next_entry::<String, CellValue>()? {
                    row.insert(label, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Category totals across the whole roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSummary {
    pub total: usize,
    pub male: usize,
    pub female: usize,
    pub intern: usize,
}

impl From<CategoryCounts> for RosterSummary {
    fn from(counts: CategoryCounts) -> Self {
        Self {
            total: counts.total(),
            male: counts.male,
            female: counts.female,
            intern: counts.intern,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub individuals: Vec<Individual>,
    pub summary: RosterSummary,
}

/// Classify a column label
///
/// The female marker is checked first because the male marker is usually a
/// substring of it.
pub fn classify_label(label: &str, markers: &CategoryMarkers) -> Option<Category> {
    let label = label.to_lowercase();
    if label.contains(&markers.female.to_lowercase()) {
        Some(Category::Female)
    } else if label.contains(&markers.male.to_lowercase()) {
        Some(Category::Male)
    } else if label.contains(&markers.intern.to_lowercase()) {
        Some(Category::Intern)
    } else {
        None
    }
}

/// Extract individuals from spreadsheet rows
///
/// Output keeps row order; within a row the order is male, female, intern.
/// When a row has several non-blank columns of the same category, the
/// rightmost one wins.
pub fn extract_roster(rows: &[RosterRow], markers: &CategoryMarkers) -> Result<Roster> {
    if rows.is_empty() {
        return Err(DrawError::EmptyInput);
    }

    let has_category_column = rows
        .iter()
        .flat_map(|row| row.labels())
        .any(|label| classify_label(label, markers).is_some());
    if !has_category_column {
        return Err(DrawError::Schema);
    }

    let mut individuals = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        let mut cells: [Option<Individual>; 3] = [None, None, None];
        for (label, value) in row.iter() {
            let Some(category) = classify_label(label, markers) else {
                continue;
            };
            // blank cells never displace a name from an earlier column
            match Individual::from_cell(&value.to_text(), category) {
                Some(person) => cells[slot_of(category)] = Some(person),
                None => debug!(row = row_index, label, "skipping blank cell"),
            }
        }
        individuals.extend(cells.into_iter().flatten());
    }

    if individuals.is_empty() {
        return Err(DrawError::NoValidRows);
    }

    let summary = RosterSummary::from(CategoryCounts::tally(&individuals));
    info!(
        total = summary.total,
        male = summary.male,
        female = summary.female,
        intern = summary.intern,
        "roster extracted"
    );

    Ok(Roster { individuals, summary })
}

fn slot_of(category: Category) -> usize {
    match category {
        Category::Male => 0,
        Category::Female => 1,
        Category::Intern => 2,
    }
}
