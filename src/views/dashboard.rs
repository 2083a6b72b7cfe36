//! Role dashboards.

use std::fmt::Write;

use crate::auth::{Role, Route};
use crate::session::User;
use crate::views::INVALID_ROLE;

/// A headline number on a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: &'static str,
    pub note: &'static str,
}

const fn card(title: &'static str, value: &'static str, note: &'static str) -> StatCard {
    StatCard { title, value, note }
}

const PLAYER_STATS: [StatCard; 4] = [
    card("Profile Views", "156", "+12% from last week"),
    card("Scout Matches", "8", "Potential opportunities"),
    card("Performance Rating", "4.8", "Out of 5.0 stars"),
    card("Training Hours", "47", "This month"),
];

const SCOUT_STATS: [StatCard; 4] = [
    card("Players Scouted", "342", "+18 this month"),
    card("Shortlisted Players", "23", "Potential recruits"),
    card("Success Rate", "87%", "Successful recommendations"),
    card("Active Searches", "12", "Ongoing talent hunts"),
];

const COACH_STATS: [StatCard; 4] = [
    card("Team Players", "24", "Active squad members"),
    card("Wins This Season", "18", "+2 from last month"),
    card("Training Sessions", "156", "Completed this season"),
    card("Upcoming Matches", "4", "Next 2 weeks"),
];

pub fn stats_for(role: Role) -> &'static [StatCard; 4] {
    match role {
        Role::Player => &PLAYER_STATS,
        Role::Scout => &SCOUT_STATS,
        Role::Coach => &COACH_STATS,
    }
}

pub fn greeting(role: Role, user: Option<&User>) -> String {
    let first_name = user
        .map(|u| u.first_name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("User");
    match role {
        Role::Player => "Welcome back".to_string(),
        Role::Scout => format!("Welcome back, Scout {first_name}!"),
        Role::Coach => format!("Welcome back, Coach {first_name}!"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub role: Role,
    pub greeting: String,
    pub stats: &'static [StatCard; 4],
}

impl Dashboard {
    pub fn new(role: Role, user: Option<&User>) -> Self {
        Self {
            role,
            greeting: greeting(role, user),
            stats: stats_for(role),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.greeting);
        let _ = writeln!(out, "{} dashboard", self.role.title());
        out.push('\n');
        for stat in self.stats {
            let _ = writeln!(out, "  {:<20} {:>6}  {}", stat.title, stat.value, stat.note);
        }
        out.push('\n');
        let _ = writeln!(out, "  View profile:  {}", Route::profile(self.role));
        let _ = writeln!(
            out,
            "  Edit profile:  {}",
            Route::ProfileEdit {
                role: self.role.as_str().to_string()
            }
        );
        out
    }
}

/// Render the dashboard for a raw role segment.
pub fn render_dashboard(role: &str, user: Option<&User>) -> String {
    match role.parse::<Role>() {
        Ok(role) => Dashboard::new(role, user).render(),
        Err(_) => INVALID_ROLE.to_string(),
    }
}
