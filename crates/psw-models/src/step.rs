//! Wizard steps

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five screens of the wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    ProjectSetup,
    Budget,
    GrossMargin,
    Demand,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::ProjectSetup,
        WizardStep::Budget,
        WizardStep::GrossMargin,
        WizardStep::Demand,
        WizardStep::Review,
    ];

    pub const FIRST: WizardStep = WizardStep::ProjectSetup;
    pub const LAST: WizardStep = WizardStep::Review;

    /// 1-based step number
    pub fn number(&self) -> u8 {
        match self {
            Self::ProjectSetup => 1,
            Self::Budget => 2,
            Self::GrossMargin => 3,
            Self::Demand => 4,
            Self::Review => 5,
        }
    }

    /// Step for a 1-based number, clamped into 1..=5
    pub fn from_number(n: i64) -> Self {
        match n {
            i64::MIN..=1 => Self::ProjectSetup,
            2 => Self::Budget,
            3 => Self::GrossMargin,
            4 => Self::Demand,
            _ => Self::Review,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ProjectSetup => "Project Setup",
            Self::Budget => "Budget",
            Self::GrossMargin => "Gross Margin",
            Self::Demand => "Resource Demand",
            Self::Review => "Review & Export",
        }
    }

    /// Following step, saturating at Review
    pub fn next(&self) -> Self {
        Self::from_number(self.number() as i64 + 1)
    }

    /// Preceding step, saturating at ProjectSetup
    pub fn prev(&self) -> Self {
        Self::from_number(self.number() as i64 - 1)
    }

    pub fn is_last(&self) -> bool {
        *self == Self::LAST
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.number(), self.title())
    }
}
