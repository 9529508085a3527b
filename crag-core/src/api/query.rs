use crate::model::ClimbType;

/// Query string of `GET /climbs/`
///
/// Grade and area selections are sent as comma lists; empty selections are
/// left out entirely so the backend applies no filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimbQuery {
    pub climb_type: Option<ClimbType>,
    pub grades: Vec<String>,
    pub areas: Vec<String>,
    pub skip: usize,
    pub limit: usize,
    pub first_ascensionist: Option<String>,
}

impl ClimbQuery {
    /// First page of `limit` climbs of the given type
    pub fn new(climb_type: Option<ClimbType>, limit: usize) -> Self {
        Self { climb_type, limit, ..Self::default() }
    }

    /// Climbs first ascended by `username`
    pub fn first_ascents_by(username: impl Into<String>) -> Self {
        Self { first_ascensionist: Some(username.into()), ..Self::default() }
    }

    pub fn with_grades(mut self, grades: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.grades = grades.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_areas(mut self, areas: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.areas = areas.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_window(mut self, skip: usize, limit: usize) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }

    /// Key/value pairs in the order they appear on the wire
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(climb_type) = self.climb_type {
            pairs.push(("type", climb_type.as_str().to_string()));
        }
        if !self.grades.is_empty() {
            pairs.push(("grades", self.grades.join(",")));
        }
        if !self.areas.is_empty() {
            pairs.push(("areas", self.areas.join(",")));
        }
        if let Some(fa) = &self.first_ascensionist {
            pairs.push(("first_ascensionist", fa.clone()));
        }
        // a zero limit means "backend default"
        if self.limit > 0 {
            pairs.push(("skip", self.skip.to_string()));
            pairs.push(("limit", self.limit.to_string()));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_joined_as_comma_lists() {
        let query = ClimbQuery::new(Some(ClimbType::Boulder), 25)
            .with_grades(["V3", "V4"])
            .with_areas(["Mwanza Hills"])
            .with_window(50, 25);

        assert_eq!(
            query.to_pairs(),
            vec![
                ("type", "Boulder".to_string()),
                ("grades", "V3,V4".to_string()),
                ("areas", "Mwanza Hills".to_string()),
                ("skip", "50".to_string()),
                ("limit", "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_selections_omitted() {
        let pairs = ClimbQuery::first_ascents_by("amina").to_pairs();
        assert_eq!(pairs, vec![("first_ascensionist", "amina".to_string())]);
    }
}
