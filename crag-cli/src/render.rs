//! Plain-text rendering of pages

use crag_core::filter::FilterState;
use crag_core::listing::ClimbRow;
use crag_core::map::MapScene;
use crag_core::model::{Climb, ClimbType, Log, User};
use crag_core::pages::{ClimbDetail, FeedPage, LoadState, ProfilePage};
use crag_core::pagination::Pager;
use std::fmt::Write;

const NA: &str = "N/A";

/// Left-aligned table with a header row
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers.to_vec());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(rule.iter().map(String::as_str).collect()));
    for row in rows {
        out.push('\n');
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

pub fn climb_rows(rows: &[ClimbRow]) -> String {
    if rows.is_empty() {
        return "No climbs found.".to_string();
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.grade.clone(),
                r.stars.clone(),
                r.area.clone(),
                year(r.first_ascent_year),
            ]
        })
        .collect();
    table(&["ID", "Name", "Grade", "Quality", "Area", "FA Year"], &cells)
}

pub fn climbs(climbs: &[Climb]) -> String {
    climb_rows(&climbs.iter().map(ClimbRow::from).collect::<Vec<_>>())
}

fn year(y: Option<i32>) -> String {
    y.map(|y| y.to_string()).unwrap_or_else(|| NA.to_string())
}

/// `Page 2 - more with --page 3`
pub fn pager_footer(pager: &Pager) -> String {
    let mut footer = pager.label();
    if pager.has_prev() {
        let _ = write!(footer, " - previous with --page {}", pager.page());
    }
    if pager.has_more() {
        let _ = write!(footer, " - more with --page {}", pager.page() + 2);
    }
    footer
}

pub fn active_filters(filter: &FilterState) -> Option<String> {
    if filter.is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    if !filter.selected_grades().is_empty() {
        parts.push(format!("grades {}", filter.sorted_grades().join(", ")));
    }
    if !filter.selected_areas().is_empty() {
        parts.push(format!("areas {}", filter.selected_areas().join(", ")));
    }
    Some(format!("Filtered by {}", parts.join("; ")))
}

/// A section whose fetch may have failed
fn section<T>(out: &mut String, title: &str, state: &LoadState<T>, body: impl FnOnce(&T) -> String) {
    let _ = writeln!(out, "\n{}", title);
    match state {
        LoadState::Loaded(value) => out.push_str(&body(value)),
        LoadState::Failed(msg) => {
            let _ = write!(out, "  unavailable: {}", msg);
        }
        LoadState::Idle => out.push_str("  log in to see this"),
    }
    out.push('\n');
}

pub fn climb_detail(detail: &ClimbDetail) -> String {
    let climb = &detail.climb;
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", climb.name, climb.href());
    let _ = writeln!(out, "  Type:     {}", climb.climb_type);
    let _ = writeln!(out, "  Grade:    {}", climb.grade.as_deref().unwrap_or(NA));
    let _ = writeln!(out, "  Quality:  {}", climb.stars());
    let _ = writeln!(out, "  Area:     {}", climb.area.as_deref().unwrap_or(NA));
    let fa = match (&climb.first_ascensionist, detail.first_ascensionist_href()) {
        (Some(name), Some(href)) => format!("{} ({})", name, href),
        (Some(name), None) => name.clone(),
        (None, _) => NA.to_string(),
    };
    let _ = writeln!(out, "  FA:       {} {}", fa, climb.first_ascent_on().map(|d| d.to_string()).unwrap_or_default());
    let _ = writeln!(out, "  Location: {:.6}, {:.6}", climb.latitude, climb.longitude);
    let tags = climb.tag_list();
    if !tags.is_empty() {
        let _ = writeln!(out, "  Tags:     {}", tags.join(", "));
    }
    if let Some(description) = climb.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "\n{}", description.trim());
    }

    let mut memberships = Vec::new();
    for (label, state) in [("ticklist", &detail.ticklist), ("hitlist", &detail.hitlist)] {
        match state {
            LoadState::Loaded(toggle) if toggle.is_member() => memberships.push(format!("on your {}", label)),
            LoadState::Loaded(_) => memberships.push(format!("not on your {}", label)),
            LoadState::Failed(msg) => memberships.push(format!("{} unavailable ({})", label, msg)),
            LoadState::Idle => {}
        }
    }
    if !memberships.is_empty() {
        let _ = writeln!(out, "\n{}", memberships.join(", "));
    }

    section(&mut out, "Logs", &detail.logs, |logs| {
        if logs.is_empty() {
            return "  no ascents logged yet".to_string();
        }
        logs.iter()
            .map(|l| log_line(l, &detail.log_author(l)))
            .collect::<Vec<_>>()
            .join("\n")
    });

    out.trim_end().to_string()
}

pub fn log_line(log: &Log, author: &str) -> String {
    let mut line = format!("  {} {} {}", log.date.get(..10).unwrap_or(&log.date), author, log.grade.as_deref().unwrap_or(NA));
    if let Some(comment) = log.comment.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(line, " - {}", comment);
    }
    line
}

fn climb_log_line(log: &Log, author: &str) -> String {
    format!("{} on {}", log_line(log, author), crag_core::routes::Route::Node(log.climb_id))
}

pub fn feed(feed: &FeedPage) -> String {
    let mut out = String::new();

    section(&mut out, "Recent ascents", &feed.recent_logs, |logs| {
        lines_or(logs.iter().map(|l| climb_log_line(l, &feed.author(l))).collect(), "  nothing yet")
    });
    section(&mut out, "Big ticks", &feed.big_ticks, |logs| {
        lines_or(logs.iter().map(|l| climb_log_line(l, &feed.author(l))).collect(), "  nothing yet")
    });
    section(&mut out, "New first ascents", &feed.first_ascents, |climbs| {
        lines_or(
            climbs
                .iter()
                .map(|c| {
                    format!(
                        "  {} {} by {} ({})",
                        c.name,
                        c.grade.as_deref().unwrap_or(NA),
                        c.first_ascensionist.as_deref().unwrap_or(NA),
                        c.href()
                    )
                })
                .collect(),
            "  nothing yet",
        )
    });

    out.trim().to_string()
}

fn lines_or(lines: Vec<String>, empty: &str) -> String {
    if lines.is_empty() {
        empty.to_string()
    } else {
        lines.join("\n")
    }
}

pub fn profile(page: &ProfilePage) -> String {
    let mut out = format!("Profile of {} ({})\n", page.user.username, page.user.href());
    section(&mut out, "Ticks", &page.ticks, |c| climbs(c));
    section(&mut out, "First Ascents", &page.first_ascents, |c| climbs(c));
    out.trim_end().to_string()
}

pub fn users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| vec![u.id.to_string(), u.username.clone(), u.href()])
        .collect();
    table(&["ID", "Username", "Profile"], &rows)
}

pub fn grades(climb_type: Option<ClimbType>) -> String {
    FilterState::grade_sections(climb_type)
        .iter()
        .map(|s| format!("{}: {}", s.title, s.grades.join(" ")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn scene_summary(scene: &MapScene) -> String {
    let mut out = format!(
        "{} climbs in {} pins, {} area polygons (centre {}, zoom {})",
        scene.marker_count(),
        scene.clusters.len(),
        scene.areas.len(),
        scene.view.center.display_fixed(),
        scene.view.zoom
    );
    for cluster in &scene.clusters {
        if cluster.is_single() {
            let m = &cluster.markers[0];
            let _ = write!(out, "\n  {} {} at {}", m.href, m.label(), m.position.display_fixed());
        } else {
            let _ = write!(out, "\n  cluster of {} at {}", cluster.len(), cluster.position.display_fixed());
        }
    }
    for warning in &scene.warnings {
        let _ = write!(out, "\nwarning: {}", warning);
    }
    out
}
