//! Presentational capability checks.
//!
//! Capabilities only hide or show affordances. The hosted store remains the
//! authority on what a caller may actually write.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Action::Read),
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            other => Err(format!("unknown action: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Events,
    MeetingCategories,
    EventCategories,
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "events" => Ok(ResourceKind::Events),
            "meeting_categories" | "commissions" => Ok(ResourceKind::MeetingCategories),
            "event_categories" => Ok(ResourceKind::EventCategories),
            other => Err(format!("unknown resource: {}", other)),
        }
    }
}

/// Answers whether the current user may perform an action.
pub trait CapabilityCheck: Send + Sync {
    fn can(&self, action: Action, resource: ResourceKind) -> bool;
}

/// Grants everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl CapabilityCheck for AllowAll {
    fn can(&self, _action: Action, _resource: ResourceKind) -> bool {
        true
    }
}

/// A fixed set of grants, parsed from `action:resource` pairs.
///
/// `*` grants everything. Reading is always allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCapabilities {
    all: bool,
    granted: HashSet<(Action, ResourceKind)>,
}

impl StaticCapabilities {
    /// Parses a comma-separated grant list such as `create:events,delete:events`.
    pub fn parse(grants: &str) -> Result<Self, String> {
        let mut capabilities = Self::default();
        for grant in grants.split(',').map(str::trim).filter(|g| !g.is_empty()) {
            if grant == "*" {
                capabilities.all = true;
                continue;
            }
            let (action, resource) = grant
                .split_once(':')
                .ok_or_else(|| format!("invalid grant: {}", grant))?;
            capabilities
                .granted
                .insert((action.trim().parse()?, resource.trim().parse()?));
        }
        Ok(capabilities)
    }
}

impl CapabilityCheck for StaticCapabilities {
    fn can(&self, action: Action, resource: ResourceKind) -> bool {
        self.all || action == Action::Read || self.granted.contains(&(action, resource))
    }
}

/// Which write affordances a view shows for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Affordances {
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

impl Affordances {
    pub fn resolve(check: &dyn CapabilityCheck, resource: ResourceKind) -> Self {
        Self {
            can_create: check.can(Action::Create, resource),
            can_update: check.can(Action::Update, resource),
            can_delete: check.can(Action::Delete, resource),
        }
    }
}
