//! Grade and area filter state
//!
//! Selections keep the order in which they were first checked and never hold
//! duplicates. Nothing is fetched here: [`FilterState::apply`] hands both
//! selections to the caller, which refetches.

use crate::grades::{self, GradeScale};
use crate::model::ClimbType;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    open: bool,
    grades: Vec<String>,
    areas: Vec<String>,
}

/// A titled group of grade checkboxes
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSection {
    pub title: &'static str,
    pub grades: &'static [&'static str],
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with initial selections, e.g. from a previous page
    pub fn with_selection(
        grades: impl IntoIterator<Item = impl Into<String>>,
        areas: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut state = Self::new();
        for grade in grades {
            state.set_grade(grade, true);
        }
        for area in areas {
            state.set_area(area, true);
        }
        state
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open or close the filter panel
    pub fn toggle_open(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn set_grade(&mut self, grade: impl Into<String>, checked: bool) {
        set_membership(&mut self.grades, grade.into(), checked);
    }

    /// Flip a grade checkbox; returns whether it is now checked
    pub fn toggle_grade(&mut self, grade: &str) -> bool {
        let checked = !self.is_grade_selected(grade);
        self.set_grade(grade, checked);
        checked
    }

    pub fn set_area(&mut self, area: impl Into<String>, checked: bool) {
        set_membership(&mut self.areas, area.into(), checked);
    }

    pub fn toggle_area(&mut self, area: &str) -> bool {
        let checked = !self.is_area_selected(area);
        self.set_area(area, checked);
        checked
    }

    pub fn is_grade_selected(&self, grade: &str) -> bool {
        self.grades.iter().any(|g| g == grade)
    }

    pub fn is_area_selected(&self, area: &str) -> bool {
        self.areas.iter().any(|a| a == area)
    }

    pub fn selected_grades(&self) -> &[String] {
        &self.grades
    }

    pub fn selected_areas(&self) -> &[String] {
        &self.areas
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty() && self.areas.is_empty()
    }

    pub fn clear(&mut self) {
        self.grades.clear();
        self.areas.clear();
    }

    /// Invoke `on_apply` with the selected grades and areas
    pub fn apply<R>(&self, on_apply: impl FnOnce(&[String], &[String]) -> R) -> R {
        log::debug!("Applying filters grades={:?} areas={:?}", self.grades, self.areas);
        on_apply(&self.grades, &self.areas)
    }

    /// Checkbox groups to show: one per discipline when no type is fixed
    pub fn grade_sections(climb_type: Option<ClimbType>) -> Vec<GradeSection> {
        match climb_type {
            Some(t) => vec![GradeSection { title: t.as_str(), grades: grades::grades_for(t) }],
            None => ClimbType::ALL
                .iter()
                .map(|t| GradeSection { title: t.as_str(), grades: grades::grades_for(*t) })
                .collect(),
        }
    }

    /// Selected grades ordered easiest first within each scale
    pub fn sorted_grades(&self) -> Vec<String> {
        let mut sorted = self.grades.clone();
        sorted.sort_by_key(|g| {
            let scale = grades::scale_of(g);
            let rank = scale.and_then(|s| s.rank(g)).unwrap_or(usize::MAX);
            (scale != Some(GradeScale::VScale), rank)
        });
        sorted
    }
}

fn set_membership(selection: &mut Vec<String>, value: String, checked: bool) {
    let present = selection.contains(&value);
    if checked && !present {
        selection.push(value);
    } else if !checked && present {
        selection.retain(|v| *v != value);
    }
}
