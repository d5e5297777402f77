use super::{Category, Individual};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Per-category member tally of a team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub male: usize,
    pub female: usize,
    pub intern: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Male => self.male,
            Category::Female => self.female,
            Category::Intern => self.intern,
        }
    }

    pub fn increment(&mut self, category: Category) {
        match category {
            Category::Male => self.male += 1,
            Category::Female => self.female += 1,
            Category::Intern => self.intern += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.male + self.female + self.intern
    }

    pub fn tally<'a>(members: impl IntoIterator<Item = &'a Individual>) -> Self {
        let mut counts = Self::default();
        for member in members {
            counts.increment(member.category);
        }
        counts
    }
}

/// One of the top-level balanced groups
///
/// Members are only added through [`Team::push`] so `counts` never drifts
/// from the member list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: usize,
    pub name: String,
    members: Vec<Individual>,
    counts: CategoryCounts,
}

impl Team {
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), members: Vec::new(), counts: CategoryCounts::default() }
    }

    pub fn push(&mut self, member: Individual) {
        self.counts.increment(member.category);
        self.members.push(member);
    }

    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    pub fn counts(&self) -> CategoryCounts {
        self.counts
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Name without the `Team ` prefix, used for sub-team slot names
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix("Team ").unwrap_or(&self.name)
    }

    pub fn sort_members(&mut self) {
        self.members.sort_by(|a, b| compare_names(&a.name, &b.name));
    }
}

/// Case-insensitive ordering for display, raw text breaks ties
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
