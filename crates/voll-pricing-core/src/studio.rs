//! Studio identification printed on pricing reports, and the read-only
//! profile it can be pre-filled from.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub address: String,
}

/// Source of default studio details, typically the signed-in owner's profile.
pub trait StudioProfile {
    fn studio_name(&self) -> Option<&str>;
    fn owner_name(&self) -> Option<&str>;
    fn address(&self) -> Option<&str>;
}

impl StudioInfo {
    /// Fill blank fields from the profile. Values the user already typed win.
    pub fn fill_from_profile(&mut self, profile: &impl StudioProfile) {
        fill_blank(&mut self.name, profile.studio_name());
        fill_blank(&mut self.owner, profile.owner_name());
        fill_blank(&mut self.address, profile.address());
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.owner.trim().is_empty() && self.address.trim().is_empty()
    }
}

fn fill_blank(field: &mut String, default: Option<&str>) {
    if !field.trim().is_empty() {
        return;
    }
    if let Some(value) = default.map(str::trim).filter(|v| !v.is_empty()) {
        *field = value.to_string();
    }
}
