//! Console screen table: every path and the access it requires.
//!
//! The guard consults this table for navigation targets; `app` mounts the
//! screens that live in this crate. Resource screens (projects, tasks,
//! nodes, ...) are listed so the guard protects them wherever they are
//! rendered.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::util::guard::AccessRequirement;

/// Unauthenticated entry point.
pub const LOGIN_PATH: &str = "/login";
/// Default landing page for authenticated operators.
pub const HOME_PATH: &str = "/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleRoute {
    Login,
    Register,
    Dashboard,
    Projects,
    ProjectDetail,
    GitCredentials,
    Tasks,
    Nodes,
    Executions,
    ExecutionDetail,
    Environment,
    Profile,
    Statistics,
    Workflows,
}

impl ConsoleRoute {
    pub const ALL: [Self; 14] = [
        Self::Login,
        Self::Register,
        Self::Dashboard,
        Self::Projects,
        Self::ProjectDetail,
        Self::GitCredentials,
        Self::Tasks,
        Self::Nodes,
        Self::Executions,
        Self::ExecutionDetail,
        Self::Environment,
        Self::Profile,
        Self::Statistics,
        Self::Workflows,
    ];

    /// Path pattern; `:id` marks a single dynamic segment.
    #[must_use]
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Login => LOGIN_PATH,
            Self::Register => "/register",
            Self::Dashboard => HOME_PATH,
            Self::Projects => "/projects",
            Self::ProjectDetail => "/projects/:id",
            Self::GitCredentials => "/git-credentials",
            Self::Tasks => "/tasks",
            Self::Nodes => "/nodes",
            Self::Executions => "/executions",
            Self::ExecutionDetail => "/executions/:id",
            Self::Environment => "/environment",
            Self::Profile => "/profile",
            Self::Statistics => "/statistics",
            Self::Workflows => "/workflows",
        }
    }

    #[must_use]
    pub fn requirement(self) -> AccessRequirement {
        match self {
            Self::Login | Self::Register => AccessRequirement::Guest,
            _ => AccessRequirement::Authenticated,
        }
    }

    /// Resolve a concrete path (query and fragment ignored) to its screen.
    #[must_use]
    pub fn match_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments = split_segments(path);
        Self::ALL.into_iter().find(|route| {
            let pattern = split_segments(route.pattern());
            pattern.len() == segments.len()
                && pattern
                    .iter()
                    .zip(&segments)
                    .all(|(expected, actual)| expected.starts_with(':') || expected == actual)
        })
    }
}

/// Access requirement for any path; unknown paths are unrestricted.
#[must_use]
pub fn requirement_for_path(path: &str) -> AccessRequirement {
    ConsoleRoute::match_path(path).map_or(AccessRequirement::Open, ConsoleRoute::requirement)
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}
