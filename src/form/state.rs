//! Raw form state as edited by the operator

use serde::{Deserialize, Serialize};

use super::normalize::{DEFAULT_TEAM_ROLE, TEAM_SLOTS};

const UNKNOWN_SDM: &str = "Unknown User";

/// Optional fields referenced by the OneNote page template of the automation script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedFields {
    pub time_tracking_case: String,
    pub external_teams_link: String,
    pub primary_datacenter: String,
    pub draas_datacenter: String,
    pub target_completion_date: String,
    pub dr_rehearsal_date: String,
    pub migration_cutover_date: String,
}

/// Everything the operator can fill in.
///
/// Deserialization is lenient: missing fields take their defaults so the page can send
/// partial updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub sales_order: String,
    pub sdm_name: String,
    pub customer_name: String,
    pub short_description: String,
    /// Filled by validation output
    pub pi_number: String,
    /// Filled by validation output
    pub pm_name: String,
    pub production: bool,
    pub draas: bool,
    pub baas: bool,
    pub copy_sedt: bool,
    pub pi_url_override: String,
    pub advanced: AdvancedFields,
    pub pi_api_key: String,
    pub team_emails: Vec<String>,
    pub team_roles: Vec<String>,
}

impl FormState {
    /// Fresh session state: empty roster slots, every role "Member".
    pub fn new(sdm_name: impl Into<String>) -> Self {
        Self {
            sdm_name: sdm_name.into(),
            team_emails: vec![String::new(); TEAM_SLOTS],
            team_roles: vec![DEFAULT_TEAM_ROLE.to_string(); TEAM_SLOTS],
            ..Self::default()
        }
    }

    pub fn any_workbook_type(&self) -> bool {
        self.production || self.draas || self.baas
    }

    /// Channel name the automation script will create, `EXTERNAL - <customer> - <sales order>`
    pub fn teams_channel_name(&self) -> String {
        format!(
            "EXTERNAL - {} - {}",
            self.customer_name.trim(),
            self.sales_order.trim()
        )
    }
}

/// SDM name from the login environment: `USERNAME`, then `USER`, then "Unknown User".
pub fn default_sdm_name<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ["USERNAME", "USER"]
        .iter()
        .filter_map(|key| lookup(key))
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_SDM.to_string())
}
