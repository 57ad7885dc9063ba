//! Request context dimensions.
//!
//! Every read the cache serves is scoped by the tenant/selection axes of the
//! caller: which user, which institute, which class, which subject, which
//! role. These dimensions participate in cache-key composition so that two
//! institutes (or two roles within one institute) never see each other's
//! cached data, and they drive invalidation scoping after writes.
//!
//! The context is an explicit struct with named optional fields rather than
//! a loose string map: a dimension the compiler knows about cannot be
//! misspelled at a call site.

use serde::{Deserialize, Serialize};

/// The role a session is acting under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SystemAdmin,
    InstituteAdmin,
    Teacher,
    AttendanceMarker,
    Student,
    Parent,
}

impl Role {
    /// The wire-format role name used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemAdmin => "SYSTEM_ADMIN",
            Self::InstituteAdmin => "INSTITUTE_ADMIN",
            Self::Teacher => "TEACHER",
            Self::AttendanceMarker => "ATTENDANCE_MARKER",
            Self::Student => "STUDENT",
            Self::Parent => "PARENT",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The context dimensions of one logical request.
///
/// All fields are optional; absent dimensions are simply excluded from
/// cache-key composition. An empty context is valid and means "global,
/// unscoped data".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: Option<String>,
    pub institute_id: Option<String>,
    pub class_id: Option<String>,
    pub subject_id: Option<String>,
    pub role: Option<Role>,
}

impl RequestContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context scoped to one institute, the most common case.
    pub fn for_institute(institute_id: impl Into<String>) -> Self {
        Self {
            institute_id: Some(institute_id.into()),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_institute(mut self, institute_id: impl Into<String>) -> Self {
        self.institute_id = Some(institute_id.into());
        self
    }

    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// True when no dimension is set.
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.institute_id.is_none()
            && self.class_id.is_none()
            && self.subject_id.is_none()
            && self.role.is_none()
    }

    /// Present dimensions as `(name, value)` pairs, sorted by name.
    ///
    /// Key composition and invalidation both go through this accessor, so
    /// they cannot disagree on naming or ordering.
    pub fn dimensions(&self) -> Vec<(&'static str, String)> {
        // Field order below is already lexicographic by dimension name.
        let mut dims = Vec::with_capacity(5);
        if let Some(class_id) = &self.class_id {
            dims.push(("classId", class_id.clone()));
        }
        if let Some(institute_id) = &self.institute_id {
            dims.push(("instituteId", institute_id.clone()));
        }
        if let Some(role) = &self.role {
            dims.push(("role", role.as_str().to_string()));
        }
        if let Some(subject_id) = &self.subject_id {
            dims.push(("subjectId", subject_id.clone()));
        }
        if let Some(user_id) = &self.user_id {
            dims.push(("userId", user_id.clone()));
        }
        dims
    }
}
