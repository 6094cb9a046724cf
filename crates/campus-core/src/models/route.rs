use std::fmt;

use serde::{Deserialize, Serialize};

/// Navigation surfaces of the admin front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Register,
    Courses,
    Students,
    Enrollments,
}

impl Route {
    /// Where a successful login lands, and where unknown paths go.
    pub const LANDING: Route = Route::Courses;

    pub const ALL: [Route; 5] = [
        Route::Login,
        Route::Register,
        Route::Courses,
        Route::Students,
        Route::Enrollments,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Courses => "/courses",
            Self::Students => "/students",
            Self::Enrollments => "/enrollments",
        }
    }

    /// Match a browser path, ignoring any query string and trailing slash.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split('?').next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
