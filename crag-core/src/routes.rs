//! Page routes of the site

use crate::model::ClimbType;
use std::fmt;

/// A navigable page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    /// Route index, all types when `None`
    Index(Option<ClimbType>),
    Map(ClimbType),
    /// Climb detail page
    Node(u64),
    /// Ascent log entry for a climb
    Log(u64),
    Profile(u64),
    Ticklist,
    Hitlist,
    AddClimb,
    AddArea,
    Login,
    Register,
    Info,
    AboutUs,
    AccessAndEthics,
    ContactUs,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Index(None) => "/climbs".to_string(),
            Route::Index(Some(t)) => format!("/{}_index", type_slug(*t)),
            Route::Map(t) => format!("/{}_map", type_slug(*t)),
            Route::Node(id) => format!("/node/{}", id),
            Route::Log(id) => format!("/log/{}", id),
            Route::Profile(id) => format!("/profile/{}", id),
            Route::Ticklist => "/ticklist".to_string(),
            Route::Hitlist => "/hitlist".to_string(),
            Route::AddClimb => "/add_climb".to_string(),
            Route::AddArea => "/add_area".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Info => "/info".to_string(),
            Route::AboutUs => "/about_us".to_string(),
            Route::AccessAndEthics => "/access_and_ethics".to_string(),
            Route::ContactUs => "/contact_us".to_string(),
        }
    }

    /// Parse a path back into a route; query strings and a trailing slash
    /// are ignored
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["climbs"] => Route::Index(None),
            ["boulder_index"] => Route::Index(Some(ClimbType::Boulder)),
            ["sport_index"] => Route::Index(Some(ClimbType::Sport)),
            ["trad_index"] => Route::Index(Some(ClimbType::Trad)),
            ["boulder_map"] => Route::Map(ClimbType::Boulder),
            ["sport_map"] => Route::Map(ClimbType::Sport),
            ["trad_map"] => Route::Map(ClimbType::Trad),
            ["node", id] => Route::Node(id.parse().ok()?),
            ["log", id] => Route::Log(id.parse().ok()?),
            ["profile", id] => Route::Profile(id.parse().ok()?),
            ["ticklist"] => Route::Ticklist,
            ["hitlist"] => Route::Hitlist,
            ["add_climb"] => Route::AddClimb,
            ["add_area"] => Route::AddArea,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["info"] => Route::Info,
            ["about_us"] => Route::AboutUs,
            ["access_and_ethics"] => Route::AccessAndEthics,
            ["contact_us"] => Route::ContactUs,
            _ => return None,
        };
        Some(route)
    }

    /// Pages that are only rendered for a logged-in user
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::Home
                | Route::Ticklist
                | Route::Hitlist
                | Route::AddClimb
                | Route::AddArea
                | Route::Log(_)
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn type_slug(t: ClimbType) -> &'static str {
    match t {
        ClimbType::Boulder => "boulder",
        ClimbType::Sport => "sport",
        ClimbType::Trad => "trad",
    }
}

/// Entry of the "Indexes" dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub route: Route,
}

/// The "Indexes" dropdown, in display order
pub fn index_menu() -> Vec<MenuEntry> {
    let mut menu = vec![MenuEntry { label: "Climbs Index", route: Route::Index(None) }];

    for (label, t) in [
        ("Boulder Index", ClimbType::Boulder),
        ("Sport Index", ClimbType::Sport),
        ("Trad Index", ClimbType::Trad),
    ] {
        menu.push(MenuEntry { label, route: Route::Index(Some(t)) });
    }
    for (label, t) in
        [("Boulder Map", ClimbType::Boulder), ("Sport Map", ClimbType::Sport), ("Trad Map", ClimbType::Trad)]
    {
        menu.push(MenuEntry { label, route: Route::Map(t) });
    }

    menu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inverts_path() {
        let routes = [
            Route::Home,
            Route::Index(None),
            Route::Index(Some(ClimbType::Sport)),
            Route::Map(ClimbType::Trad),
            Route::Node(42),
            Route::Log(42),
            Route::Profile(9),
            Route::AddArea,
            Route::AccessAndEthics,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route), "{}", route);
        }
    }

    #[test]
    fn test_parse_edge_cases() {
        assert_eq!(Route::parse("/node/7/"), Some(Route::Node(7)));
        assert_eq!(Route::parse("/climbs?page=2"), Some(Route::Index(None)));
        assert_eq!(Route::parse("/node/abc"), None);
        assert_eq!(Route::parse("/nowhere"), None);
    }

    #[test]
    fn test_protected_pages() {
        assert!(Route::Ticklist.requires_auth());
        assert!(Route::Log(1).requires_auth());
        assert!(!Route::Node(1).requires_auth());
        assert!(!Route::Login.requires_auth());
        assert!(!Route::Map(ClimbType::Boulder).requires_auth());
    }

    #[test]
    fn test_index_menu_order() {
        let labels: Vec<&str> = index_menu().iter().map(|e| e.label).collect();
        assert_eq!(labels.first(), Some(&"Climbs Index"));
        assert_eq!(labels.len(), 7);
        assert_eq!(index_menu()[4].route.path(), "/boulder_map");
    }
}
