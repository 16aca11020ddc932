//! Reference data
//!
//! Static lookup tables the wizard reads from: rate card, industries, office
//! locations, budget templates, and the mocked SAP project directory.
//! Callers hold a `ReferenceData` value (usually `ReferenceData::shared()`)
//! instead of reaching into globals.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::template::{BudgetTemplate, WorkItem, WorkPackage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Industry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceManager {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Project record returned by the (mocked) SAP lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SapProjectRecord {
    pub project_id: String,
    pub client_id: String,
    pub client_name: String,
    pub year_end: String,
    pub delivery_org: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCategory {
    pub id: String,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    pub roles: Vec<Role>,
    pub industries: Vec<Industry>,
    pub locations: Vec<Location>,
    pub templates: Vec<BudgetTemplate>,
    pub sap_projects: Vec<SapProjectRecord>,
    pub resource_managers: Vec<ResourceManager>,
    pub delivery_service_orgs: Vec<String>,
    pub template_categories: Vec<TemplateCategory>,
}

static STANDARD: Lazy<Arc<ReferenceData>> = Lazy::new(|| Arc::new(build_standard()));

impl ReferenceData {
    /// Shared handle to the standard tables
    pub fn shared() -> Arc<ReferenceData> {
        Arc::clone(&STANDARD)
    }

    /// Owned copy of the standard tables (for tests that tweak them)
    pub fn standard() -> ReferenceData {
        STANDARD.as_ref().clone()
    }

    pub fn role(&self, id: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name)
    }

    pub fn active_roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter().filter(|r| r.is_active)
    }

    pub fn industry(&self, id: &str) -> Option<&Industry> {
        self.industries.iter().find(|i| i.id == id)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn template(&self, id: &str) -> Option<&BudgetTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn templates_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a BudgetTemplate> + 'a {
        self.templates.iter().filter(move |t| t.category == category)
    }

    pub fn resource_manager(&self, id: &str) -> Option<&ResourceManager> {
        self.resource_managers.iter().find(|m| m.id == id)
    }

    pub fn lookup_sap_project(&self, project_id: &str) -> Option<&SapProjectRecord> {
        let project_id = project_id.trim();
        self.sap_projects.iter().find(|p| p.project_id == project_id)
    }
}

fn role(id: &str, name: &str, standard_rate: f64, labor_cost: f64) -> Role {
    Role::new(id, name, standard_rate, labor_cost)
}

fn named(id: &str, name: &str) -> (String, String) {
    (id.to_string(), name.to_string())
}

fn item(id: &str, code: &str, name: &str, display_order: u32) -> WorkItem {
    WorkItem {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        display_order,
    }
}

fn package(
    id: &str,
    extension_id: &str,
    name: &str,
    display_order: u32,
    work_items: Vec<WorkItem>,
) -> WorkPackage {
    WorkPackage {
        id: id.to_string(),
        extension_id: extension_id.to_string(),
        name: name.to_string(),
        display_order,
        work_items,
    }
}

fn template(id: &str, name: &str, category: &str, work_packages: Vec<WorkPackage>) -> BudgetTemplate {
    BudgetTemplate {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        work_packages,
    }
}

fn sap(project_id: &str, client_id: &str, client_name: &str, year_end: &str, org: &str) -> SapProjectRecord {
    SapProjectRecord {
        project_id: project_id.to_string(),
        client_id: client_id.to_string(),
        client_name: client_name.to_string(),
        year_end: year_end.to_string(),
        delivery_org: org.to_string(),
    }
}

fn build_standard() -> ReferenceData {
    let roles = vec![
        role("T001", "Partner", 830.0, 368.0),
        role("T002", "Senior Partner", 895.0, 386.0),
        role("T035", "Managing Dir", 725.0, 345.0),
        role("T006", "Director", 680.0, 238.0),
        role("T005", "Senior Manager", 660.0, 150.0),
        role("T004", "Manager", 580.0, 109.0),
        role("T003", "Senior", 430.0, 73.0),
        role("T007", "Staff", 300.0, 51.0),
        role("T034", "Intern", 200.0, 36.0),
        role("T023", "India-Director", 680.0, 81.0).india(),
        role("T022", "India-Senior Manager", 660.0, 41.0).india(),
        role("T021", "India-Manager", 580.0, 30.0).india(),
        role("T020", "India-Senior", 430.0, 20.0).india(),
        role("T019", "India-Staff", 300.0, 13.0).india(),
    ];

    let industries = [
        named("1", "Affordable Housing"),
        named("2", "Cannabis"),
        named("3", "Commercial Real Estate"),
        named("4", "Construction"),
        named("5", "Family Offices (Services)"),
        named("6", "Financial Services"),
        named("7", "Financial Sponsors"),
        named("8", "Government"),
        named("9", "Government Contracting"),
        named("10", "HealthCare"),
        named("11", "Hospitality"),
        named("12", "Life Sciences"),
        named("13", "Manufacturing & Distribution"),
        named("14", "Not For Profit & Education"),
        named("15", "Private Client Services"),
        named("16", "Private Equity"),
        named("17", "Professional Services"),
        named("18", "Renewable Energy"),
        named("19", "Retail & Consumer Products"),
        named("20", "Technology"),
    ]
    .into_iter()
    .map(|(id, name)| Industry { id, name })
    .collect();

    let locations = [
        named("1", "Atlanta"),
        named("2", "Austin"),
        named("3", "Baltimore"),
        named("4", "Bethesda"),
        named("5", "Boca Raton"),
        named("6", "Boston"),
        named("7", "Charlotte"),
        named("8", "Chennai"),
        named("9", "Chicago"),
        named("10", "Dallas"),
        named("11", "Denver"),
        named("12", "Hartford"),
        named("13", "Houston"),
        named("14", "Los Angeles"),
        named("15", "Miami"),
        named("16", "New York"),
        named("17", "Parsippany"),
        named("18", "Philippines"),
        named("19", "San Francisco"),
        named("20", "Tampa"),
        named("21", "Tysons Corner"),
        named("22", "Washington DC"),
    ]
    .into_iter()
    .map(|(id, name)| Location { id, name })
    .collect();

    let templates = vec![
        template(
            "assur-standard",
            "ASSUR-Standard",
            "Assurance",
            vec![
                package(
                    "wp-1",
                    "1.1",
                    "Preliminary Engagement Activities",
                    1,
                    vec![
                        item("wi-1-1", "P567", "Entity Info and Background", 1),
                        item("wi-1-2", "P314", "Client/Engmt Acceptance & Continuance Form", 2),
                        item("wi-1-3", "P315", "Comm-PredAuditor Prior to Acceptance", 3),
                        item("wi-1-4", "P318", "Audit Budget & GM projection", 4),
                        item("wi-1-5", "P319", "Audit Engagement Letter", 5),
                    ],
                ),
                package(
                    "wp-2",
                    "1.2",
                    "Planning",
                    2,
                    vec![
                        item("wi-2-1", "P400", "Risk Assessment", 1),
                        item("wi-2-2", "P401", "Materiality Determination", 2),
                        item("wi-2-3", "P402", "Audit Strategy", 3),
                        item("wi-2-4", "P403", "Audit Plan Documentation", 4),
                    ],
                ),
                package(
                    "wp-3",
                    "1.3",
                    "Internal Controls",
                    3,
                    vec![
                        item("wi-3-1", "P500", "Understand Entity Controls", 1),
                        item("wi-3-2", "P501", "Test of Controls", 2),
                        item("wi-3-3", "P502", "IT General Controls", 3),
                    ],
                ),
                package(
                    "wp-4",
                    "1.4",
                    "Substantive Testing",
                    4,
                    vec![
                        item("wi-4-1", "P600", "Cash and Equivalents", 1),
                        item("wi-4-2", "P601", "Accounts Receivable", 2),
                        item("wi-4-3", "P602", "Inventory", 3),
                        item("wi-4-4", "P603", "Fixed Assets", 4),
                        item("wi-4-5", "P604", "Accounts Payable", 5),
                        item("wi-4-6", "P605", "Revenue Testing", 6),
                    ],
                ),
                package(
                    "wp-5",
                    "1.5",
                    "Completion",
                    5,
                    vec![
                        item("wi-5-1", "P700", "Subsequent Events", 1),
                        item("wi-5-2", "P701", "Management Representations", 2),
                        item("wi-5-3", "P702", "Final Analytics", 3),
                        item("wi-5-4", "P703", "Audit Report Preparation", 4),
                    ],
                ),
            ],
        ),
        template(
            "tax-compliance",
            "Tax Compliance",
            "Tax",
            vec![
                package(
                    "tax-wp-1",
                    "1.1",
                    "Scheduling/Engagement Planning",
                    1,
                    vec![
                        item("tax-wi-1-1", "T100", "Client Intake", 1),
                        item("tax-wi-1-2", "T101", "Prior Year Review", 2),
                    ],
                ),
                package(
                    "tax-wp-2",
                    "1.2",
                    "Extensions",
                    2,
                    vec![item("tax-wi-2-1", "T200", "Prepare Extensions", 1)],
                ),
                package(
                    "tax-wp-3",
                    "1.3",
                    "Estimates/Tax Planning",
                    3,
                    vec![
                        item("tax-wi-3-1", "T300", "Quarterly Estimates", 1),
                        item("tax-wi-3-2", "T301", "Tax Projections", 2),
                    ],
                ),
                package(
                    "tax-wp-4",
                    "1.4",
                    "Preparation",
                    4,
                    vec![
                        item("tax-wi-4-1", "T400", "Federal Return", 1),
                        item("tax-wi-4-2", "T401", "State Returns", 2),
                        item("tax-wi-4-3", "T402", "Local Returns", 3),
                    ],
                ),
                package(
                    "tax-wp-5",
                    "1.5",
                    "Review",
                    5,
                    vec![
                        item("tax-wi-5-1", "T500", "Manager Review", 1),
                        item("tax-wi-5-2", "T501", "Partner Review", 2),
                    ],
                ),
            ],
        ),
        template(
            "gcs-standard",
            "GCS-Standard",
            "GCS (Advisory)",
            vec![
                package("gcs-wp-1", "1.1", "Project Management & Administration", 1, vec![]),
                package("gcs-wp-2", "1.2", "Project Planning/Define", 2, vec![]),
                package("gcs-wp-3", "1.3", "Discovery/Assess/Onboard", 3, vec![]),
                package("gcs-wp-4", "1.4", "Project Execution: Design/Delivery", 4, vec![]),
                package("gcs-wp-5", "1.5", "Post-Delivery Support", 5, vec![]),
                package("gcs-wp-6", "1.6", "Travel", 6, vec![]),
            ],
        ),
        template(
            "v360-tas",
            "V360-TAS",
            "V360 (Valuation)",
            vec![
                package(
                    "v360-wp-1",
                    "1.1",
                    "Due Diligence Procedures",
                    1,
                    vec![
                        item("v360-wi-1-1", "P781", "Reading audit/review work papers", 1),
                        item("v360-wi-1-2", "P782", "All other due diligence procedures", 2),
                        item("v360-wi-1-3", "P783", "India team's time", 3),
                    ],
                ),
                package(
                    "v360-wp-2",
                    "1.2",
                    "Tax Due Diligence",
                    2,
                    vec![item("v360-wi-2-1", "P786", "Tax due diligence", 1)],
                ),
                package(
                    "v360-wp-3",
                    "1.3",
                    "Financial Due Diligence",
                    3,
                    vec![
                        item("v360-wi-3-1", "P790", "Quality of earnings", 1),
                        item("v360-wi-3-2", "P791", "Working capital analysis", 2),
                    ],
                ),
            ],
        ),
    ];

    let sap_projects = vec![
        sap("0001251396026", "C10045", "Acme Corporation", "12/31/2024", "Assurance"),
        sap("0002491434026", "C10102", "TechStart Inc", "06/30/2024", "Tax"),
        sap("0017850123025", "C20033", "Global Manufacturing LLC", "12/31/2024", "Assurance"),
        sap("0018621413025", "C30055", "HealthFirst Partners", "09/30/2024", "GCS"),
        sap("0019234567890", "C40088", "Renewable Energy Corp", "12/31/2024", "V360"),
    ];

    let resource_managers = [
        ("rm-1", "Sandy Stanfield", "sstanfield@cr.com"),
        ("rm-2", "John Mitchell", "jmitchell@cr.com"),
        ("rm-3", "Maria Garcia", "mgarcia@cr.com"),
        ("rm-4", "David Chen", "dchen@cr.com"),
    ]
    .into_iter()
    .map(|(id, name, email)| ResourceManager {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
    })
    .collect();

    let delivery_service_orgs = ["Assurance", "Tax", "GCS", "V360", "Consulting", "Government"]
        .into_iter()
        .map(String::from)
        .collect();

    let template_categories = [
        ("assurance", "Assurance", 20),
        ("tax", "Tax", 10),
        ("gcs", "GCS (Advisory)", 20),
        ("v360", "V360 (Valuation)", 15),
        ("ah", "Affordable Housing", 10),
        ("other", "Other", 10),
    ]
    .into_iter()
    .map(|(id, name, count)| TemplateCategory {
        id: id.to_string(),
        name: name.to_string(),
        count,
    })
    .collect();

    ReferenceData {
        roles,
        industries,
        locations,
        templates,
        sap_projects,
        resource_managers,
        delivery_service_orgs,
        template_categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rate_card() {
        let data = ReferenceData::shared();
        let manager = data.role("T004").unwrap();
        assert_eq!(manager.name, "Manager");
        assert_eq!(manager.standard_rate, 580.0);
        assert_eq!(manager.labor_cost, 109.0);

        assert_eq!(data.roles.len(), 14);
        assert_eq!(data.roles.iter().filter(|r| r.is_india).count(), 5);
        assert!(data.role("T999").is_none());
    }

    #[test]
    fn test_lookups() {
        let data = ReferenceData::shared();
        assert_eq!(data.industry("20").unwrap().name, "Technology");
        assert_eq!(data.location("16").unwrap().name, "New York");
        assert_eq!(data.template("assur-standard").unwrap().work_packages.len(), 5);
        assert_eq!(data.role_by_name("Staff").unwrap().id, "T007");
        assert_eq!(data.resource_manager("rm-2").unwrap().name, "John Mitchell");
        assert_eq!(data.templates_in_category("Tax").count(), 1);
    }

    #[test]
    fn test_sap_lookup_trims_input() {
        let data = ReferenceData::shared();
        let record = data.lookup_sap_project(" 0001251396026 ").unwrap();
        assert_eq!(record.client_name, "Acme Corporation");
        assert!(data.lookup_sap_project("0000000000000").is_none());
    }

    #[test]
    fn test_gcs_packages_have_no_items() {
        let data = ReferenceData::shared();
        let gcs = data.template("gcs-standard").unwrap();
        assert!(gcs.work_packages.iter().all(|wp| wp.work_items.is_empty()));
    }
}
