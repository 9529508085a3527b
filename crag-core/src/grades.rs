//! Grade vocabularies
//!
//! Boulders use the V-scale; sport and trad routes share the French scale.
//! Lists are ordered from easiest to hardest.

use crate::model::ClimbType;

/// Highest star rating a climb can have
pub const MAX_QUALITY: u8 = 5;

/// Maximum length of an ascent log comment
pub const MAX_COMMENT_LEN: usize = 200;

pub const V_SCALE: &[&str] = &[
    "V0-", "V0", "V0+", "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11",
    "V12", "V13", "V14", "V15", "V16", "V17",
];

pub const FRENCH_SCALE: &[&str] = &[
    "4", "5a", "5b", "5c", "6a", "6a+", "6b", "6b+", "6c", "6c+", "7a", "7a+", "7b", "7b+", "7c",
    "7c+", "8a", "8a+", "8b", "8b+", "8c", "8c+", "9a", "9a+", "9b", "9b+", "9c",
];

/// Grading system used by a discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeScale {
    VScale,
    French,
}

impl GradeScale {
    pub fn for_type(climb_type: ClimbType) -> Self {
        match climb_type {
            ClimbType::Boulder => GradeScale::VScale,
            ClimbType::Sport | ClimbType::Trad => GradeScale::French,
        }
    }

    pub fn grades(&self) -> &'static [&'static str] {
        match self {
            GradeScale::VScale => V_SCALE,
            GradeScale::French => FRENCH_SCALE,
        }
    }

    /// Position of `grade` on this scale (0 = easiest)
    pub fn rank(&self, grade: &str) -> Option<usize> {
        self.grades().iter().position(|g| *g == grade.trim())
    }
}

/// Grade selector options for a climb of the given type
pub fn grades_for(climb_type: ClimbType) -> &'static [&'static str] {
    GradeScale::for_type(climb_type).grades()
}

/// Options shown when no type is selected yet (filters, log form)
pub fn all_grades() -> Vec<&'static str> {
    V_SCALE.iter().chain(FRENCH_SCALE.iter()).copied().collect()
}

/// Whether `grade` belongs to the vocabulary of `climb_type`
pub fn is_valid_grade(climb_type: ClimbType, grade: &str) -> bool {
    GradeScale::for_type(climb_type).rank(grade).is_some()
}

/// Which scale a free-standing grade string belongs to, if any
pub fn scale_of(grade: &str) -> Option<GradeScale> {
    if GradeScale::VScale.rank(grade).is_some() {
        Some(GradeScale::VScale)
    } else if GradeScale::French.rank(grade).is_some() {
        Some(GradeScale::French)
    } else {
        None
    }
}
