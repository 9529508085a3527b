//! Route index controller
//!
//! One controller serves every index page; the discipline is a parameter
//! (`None` lists all climbs). It owns the filter and pagination state and the
//! rows of the page currently shown.

use crate::api::{CatalogApi, ClimbQuery};
use crate::error::{Error, Result};
use crate::filter::FilterState;
use crate::model::{Climb, ClimbType};
use crate::pages::LoadState;
use crate::pagination::Pager;

/// Table row of an index page
#[derive(Debug, Clone, PartialEq)]
pub struct ClimbRow {
    pub id: u64,
    pub name: String,
    pub climb_type: ClimbType,
    /// `N/A` when the backend has none
    pub grade: String,
    pub stars: String,
    pub area: String,
    pub first_ascent_year: Option<i32>,
    pub href: String,
}

impl From<&Climb> for ClimbRow {
    fn from(climb: &Climb) -> Self {
        Self {
            id: climb.id,
            name: climb.name.clone(),
            climb_type: climb.climb_type,
            grade: climb.grade.clone().unwrap_or_else(|| "N/A".to_string()),
            stars: climb.stars(),
            area: climb.area.clone().unwrap_or_else(|| "N/A".to_string()),
            first_ascent_year: climb.first_ascent_year(),
            href: climb.href(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClimbIndex {
    climb_type: Option<ClimbType>,
    filter: FilterState,
    pager: Pager,
    state: LoadState<Vec<Climb>>,
}

impl ClimbIndex {
    pub fn new(climb_type: Option<ClimbType>, page_size: usize) -> Self {
        Self {
            climb_type,
            filter: FilterState::new(),
            pager: Pager::new(page_size),
            state: LoadState::Idle,
        }
    }

    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self
    }

    pub fn climb_type(&self) -> Option<ClimbType> {
        self.climb_type
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Checkbox changes are local until [`ClimbIndex::apply_filters`]
    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn state(&self) -> &LoadState<Vec<Climb>> {
        &self.state
    }

    pub fn climbs(&self) -> &[Climb] {
        self.state.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows(&self) -> Vec<ClimbRow> {
        self.climbs().iter().map(ClimbRow::from).collect()
    }

    /// Query for `page` with the current selections
    ///
    /// Fails with [`Error::Validation`] when the page lies beyond any
    /// addressable offset.
    pub fn query_for(&self, page: usize) -> Result<ClimbQuery> {
        let (skip, limit) = self
            .pager
            .window_for(page)
            .ok_or_else(|| Error::Validation(vec![format!("page {} is out of range", page.saturating_add(1))]))?;
        Ok(self.filter.apply(|grades, areas| {
            ClimbQuery::new(self.climb_type, limit)
                .with_grades(grades.iter().cloned())
                .with_areas(areas.iter().cloned())
                .with_window(skip, limit)
        }))
    }

    /// Reload the current page
    pub async fn refresh(&mut self, api: &dyn CatalogApi) -> Result<()> {
        self.load(api, self.pager.page()).await
    }

    /// Refetch from the first page with the current selections
    pub async fn apply_filters(&mut self, api: &dyn CatalogApi) -> Result<()> {
        self.pager.reset();
        self.load(api, 0).await
    }

    /// Returns `false` without fetching when there is no next page
    pub async fn next_page(&mut self, api: &dyn CatalogApi) -> Result<bool> {
        match self.pager.next_page() {
            Some(page) => self.load(api, page).await.map(|_| true),
            None => Ok(false),
        }
    }

    pub async fn prev_page(&mut self, api: &dyn CatalogApi) -> Result<bool> {
        match self.pager.prev_page() {
            Some(page) => self.load(api, page).await.map(|_| true),
            None => Ok(false),
        }
    }

    /// Jump straight to a zero-based page
    pub async fn go_to(&mut self, api: &dyn CatalogApi, page: usize) -> Result<()> {
        self.load(api, page).await
    }

    async fn load(&mut self, api: &dyn CatalogApi, page: usize) -> Result<()> {
        let query = self.query_for(page)?;
        match api.list_climbs(&query).await {
            Ok(climbs) => {
                log::debug!("Loaded {} climbs for page {}", climbs.len(), page);
                self.pager.commit(page, climbs.len());
                self.state = LoadState::Loaded(climbs);
                Ok(())
            }
            Err(e) => {
                log::error!("Fetching climbs failed: {}", e);
                self.state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }
}
