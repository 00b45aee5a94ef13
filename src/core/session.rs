//! Session and scope context.
//!
//! The source product read project/auth identifiers straight out of shared
//! client storage at arbitrary points. Here the persisted client state has
//! a single owner: `SessionStore` is set on login and project selection and
//! wiped in one place on logout or session invalidation, and every fetch
//! receives an explicit `Scope` instead of reaching into globals.

use serde::Serialize;

use crate::core::error::ApiError;

/// Owner of the persisted client session: auth tokens plus the currently
/// selected project. The admin console keeps a separate session from the
/// regular user one.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    user_token: Option<String>,
    admin_token: Option<String>,
    current_project_id: Option<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, token: impl Into<String>) {
        self.user_token = Some(token.into());
    }

    pub fn login_admin(&mut self, token: impl Into<String>) {
        self.admin_token = Some(token.into());
    }

    pub fn select_project(&mut self, project_id: impl Into<String>) {
        self.current_project_id = Some(project_id.into());
    }

    pub fn user_token(&self) -> Option<&str> {
        self.user_token.as_deref()
    }

    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }

    pub fn current_project_id(&self) -> Option<&str> {
        self.current_project_id.as_deref()
    }

    /// Hard wipe on logout or `ApiError::SessionInvalidated`. Clears every
    /// piece of persisted session state, including the project selection.
    pub fn clear(&mut self) {
        self.user_token = None;
        self.admin_token = None;
        self.current_project_id = None;
    }

    /// Build the scope for a project-level fetch, failing with a
    /// scope-missing error (not a crash) when no project is selected.
    pub fn project_scope(&self) -> Result<Scope, ApiError> {
        let project_id = self
            .current_project_id
            .as_deref()
            .ok_or(ApiError::ScopeMissing { what: "project" })?;
        Ok(Scope::project(project_id))
    }
}

/// Identifiers narrowing a master-data fetch or mutation to the correct
/// tenant and sub-resource. Serializes into every request body using the
/// backend's field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scope {
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(rename = "componentId", skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(rename = "gType", skip_serializing_if = "Option::is_none")]
    pub g_type: Option<String>,
    #[serde(rename = "specId", skip_serializing_if = "Option::is_none")]
    pub spec_id: Option<String>,
}

impl Scope {
    pub fn project(project_id: impl Into<String>) -> Self {
        Scope {
            project_id: Some(project_id.into()),
            ..Scope::default()
        }
    }

    pub fn with_component(mut self, component_id: impl Into<String>) -> Self {
        self.component_id = Some(component_id.into());
        self
    }

    pub fn with_g_type(mut self, g_type: impl Into<String>) -> Self {
        self.g_type = Some(g_type.into());
        self
    }

    pub fn with_spec(mut self, spec_id: impl Into<String>) -> Self {
        self.spec_id = Some(spec_id.into());
        self
    }
}

/// Which scope identifiers a screen needs before it may issue any fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeRequirement {
    pub project: bool,
    pub component: bool,
    pub g_type: bool,
    pub spec: bool,
}

impl ScopeRequirement {
    pub const fn project() -> Self {
        ScopeRequirement {
            project: true,
            component: false,
            g_type: false,
            spec: false,
        }
    }

    pub const fn and_component(mut self) -> Self {
        self.component = true;
        self
    }

    pub const fn and_g_type(mut self) -> Self {
        self.g_type = true;
        self
    }

    pub const fn and_spec(mut self) -> Self {
        self.spec = true;
        self
    }

    /// Check the scope before a fetch; the first missing identifier is
    /// reported as a user-facing scope error.
    pub fn check(&self, scope: &Scope) -> Result<(), ApiError> {
        if self.project && scope.project_id.is_none() {
            return Err(ApiError::ScopeMissing { what: "project" });
        }
        if self.component && scope.component_id.is_none() {
            return Err(ApiError::ScopeMissing { what: "component" });
        }
        if self.g_type && scope.g_type.is_none() {
            return Err(ApiError::ScopeMissing { what: "group type" });
        }
        if self.spec && scope.spec_id.is_none() {
            return Err(ApiError::ScopeMissing { what: "spec" });
        }
        Ok(())
    }
}
