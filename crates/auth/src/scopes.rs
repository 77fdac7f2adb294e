//! Permission scopes checked by the versioned endpoints

pub const SCHEDULE_READ: &str = "schedule:read";
pub const SCHEDULE_WRITE: &str = "schedule:write";
pub const APPS_READ: &str = "apps:read";
pub const APPS_WRITE: &str = "apps:write";
pub const TEAM_READ: &str = "team:read";
pub const TEAM_WRITE: &str = "team:write";

/// Grants every scope
pub const WILDCARD: &str = "*";
