use serde::{Deserialize, Serialize};

/// Roster classification tag. Every individual carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Male,
    Female,
    Intern,
}

impl Category {
    /// Extraction order within a single roster row
    pub const ALL: [Category; 3] = [Category::Male, Category::Female, Category::Intern];

    /// Glyph used next to names in exported team lists
    pub fn glyph(&self) -> &'static str {
        match self {
            Category::Male => "♂",
            Category::Female => "♀",
            Category::Intern => "🧑‍💻",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Male => "Male",
            Category::Female => "Female",
            Category::Intern => "Interns",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub name: String,
    pub category: Category,
}

impl Individual {
    /// Build an individual from raw cell text; `None` when nothing is left after trimming.
    pub fn from_cell(raw: &str, category: Category) -> Option<Self> {
        let name = raw.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self { name: name.to_string(), category })
    }

    /// `"<name> <glyph>"` as shown in the full team list
    pub fn display(&self) -> String {
        format!("{} {}", self.name, self.category.glyph())
    }
}
