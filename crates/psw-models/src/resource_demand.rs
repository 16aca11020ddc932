//! Resource demand model
//!
//! A staffing request for the first twelve weeks of the engagement, uploaded
//! to ProFinda.

use std::collections::BTreeMap;
use std::fmt;

use psw_core::traits::{Entity, Id, Identifiable, Patch};
use psw_core::types::generate_id;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of weeks a demand schedule covers
pub const DEMAND_WEEKS: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RequestType {
    /// A specific employee
    Named,
    /// A role at a location, person chosen later
    #[default]
    Unnamed,
    Generic,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Named => "Named",
            Self::Unnamed => "Unnamed",
            Self::Generic => "Generic",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sparse week -> hours schedule
///
/// A missing week and a week with zero hours are the same thing; `get`
/// returns 0 for both and `set` with 0 removes the entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyHours(BTreeMap<u8, f64>);

impl WeeklyHours {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid_week(week: u8) -> bool {
        (1..=DEMAND_WEEKS).contains(&week)
    }

    pub fn get(&self, week: u8) -> f64 {
        self.0.get(&week).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, week: u8, hours: f64) {
        if hours == 0.0 {
            self.0.remove(&week);
        } else {
            self.0.insert(week, hours);
        }
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Weeks with non-zero hours, ascending
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.0.iter().map(|(w, h)| (*w, *h)).filter(|(_, h)| *h != 0.0)
    }

    /// All twelve weeks, absent ones as 0
    pub fn dense(&self) -> [f64; DEMAND_WEEKS as usize] {
        let mut weeks = [0.0; DEMAND_WEEKS as usize];
        for (i, slot) in weeks.iter_mut().enumerate() {
            *slot = self.get(i as u8 + 1);
        }
        weeks
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl FromIterator<(u8, f64)> for WeeklyHours {
    fn from_iter<I: IntoIterator<Item = (u8, f64)>>(iter: I) -> Self {
        let mut hours = WeeklyHours::new();
        for (week, h) in iter {
            hours.set(week, h);
        }
        hours
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDemand {
    pub id: Id,
    pub request_type: RequestType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub role_id: String,
    #[serde(default)]
    pub service_department: String,
    #[serde(default)]
    pub location_id: String,
    #[serde(default)]
    pub weekly_hours: WeeklyHours,
}

impl Identifiable for ResourceDemand {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for ResourceDemand {
    const TYPE_NAME: &'static str = "ResourceDemand";
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewResourceDemand {
    pub request_type: RequestType,
    #[validate(email(message = "is not a valid email address"))]
    pub employee_email: Option<String>,
    pub employee_name: Option<String>,
    pub employee_id: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub role_id: String,
    pub service_department: String,
    pub location_id: String,
    pub weekly_hours: WeeklyHours,
}

impl From<NewResourceDemand> for ResourceDemand {
    fn from(new: NewResourceDemand) -> Self {
        Self {
            id: generate_id(),
            request_type: new.request_type,
            employee_email: new.employee_email,
            employee_name: new.employee_name,
            employee_id: new.employee_id,
            role_id: new.role_id,
            service_department: new.service_department,
            location_id: new.location_id,
            weekly_hours: new.weekly_hours,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDemandPatch {
    pub request_type: Option<RequestType>,
    #[validate(email(message = "is not a valid email address"))]
    pub employee_email: Option<String>,
    pub employee_name: Option<String>,
    pub employee_id: Option<String>,
    pub role_id: Option<String>,
    pub service_department: Option<String>,
    pub location_id: Option<String>,
}

impl Patch<ResourceDemand> for ResourceDemandPatch {
    fn apply_to(&self, demand: &mut ResourceDemand) {
        if let Some(request_type) = self.request_type {
            demand.request_type = request_type;
        }
        if let Some(ref email) = self.employee_email {
            demand.employee_email = Some(email.clone());
        }
        if let Some(ref name) = self.employee_name {
            demand.employee_name = Some(name.clone());
        }
        if let Some(ref id) = self.employee_id {
            demand.employee_id = Some(id.clone());
        }
        if let Some(ref role_id) = self.role_id {
            demand.role_id = role_id.clone();
        }
        if let Some(ref dept) = self.service_department {
            demand.service_department = dept.clone();
        }
        if let Some(ref location_id) = self.location_id {
            demand.location_id = location_id.clone();
        }
    }

    fn is_empty(&self) -> bool {
        *self == ResourceDemandPatch::default()
    }
}
