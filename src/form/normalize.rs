//! Field normalization applied before any value leaves the process.
//!
//! Nothing here rejects input: long values are clamped and short rosters padded.
//! Rejection happens separately in `validation`.

use super::state::{AdvancedFields, FormState};

pub const SHORT_DESCRIPTION_MAX_CHARS: usize = 25;
pub const TEAM_SLOTS: usize = 6;
pub const DEFAULT_TEAM_ROLE: &str = "Member";
pub const OWNER_TEAM_ROLE: &str = "Owner";

/// A form whose fields are trimmed and whose roster holds exactly [`TEAM_SLOTS`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedForm {
    form: FormState,
}

impl NormalizedForm {
    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn emails(&self) -> &[String] {
        &self.form.team_emails
    }

    pub fn roles(&self) -> &[String] {
        &self.form.team_roles
    }
}

impl std::ops::Deref for NormalizedForm {
    type Target = FormState;

    fn deref(&self) -> &FormState {
        &self.form
    }
}

pub fn normalize(form: &FormState) -> NormalizedForm {
    let advanced = &form.advanced;
    let normalized = FormState {
        sales_order: form.sales_order.trim().to_string(),
        sdm_name: form.sdm_name.trim().to_string(),
        customer_name: form.customer_name.trim().to_string(),
        short_description: normalize_short_description(&form.short_description),
        pi_number: form.pi_number.trim().to_string(),
        pm_name: form.pm_name.trim().to_string(),
        production: form.production,
        draas: form.draas,
        baas: form.baas,
        copy_sedt: form.copy_sedt,
        pi_url_override: form.pi_url_override.trim().to_string(),
        advanced: AdvancedFields {
            time_tracking_case: advanced.time_tracking_case.trim().to_string(),
            external_teams_link: advanced.external_teams_link.trim().to_string(),
            primary_datacenter: advanced.primary_datacenter.trim().to_string(),
            draas_datacenter: advanced.draas_datacenter.trim().to_string(),
            target_completion_date: advanced.target_completion_date.trim().to_string(),
            dr_rehearsal_date: advanced.dr_rehearsal_date.trim().to_string(),
            migration_cutover_date: advanced.migration_cutover_date.trim().to_string(),
        },
        pi_api_key: form.pi_api_key.trim().to_string(),
        team_emails: pad_emails(&form.team_emails),
        team_roles: normalize_roles(&form.team_roles),
    };
    NormalizedForm { form: normalized }
}

/// Trim, then keep at most [`SHORT_DESCRIPTION_MAX_CHARS`] characters.
pub fn normalize_short_description(raw: &str) -> String {
    raw.trim()
        .chars()
        .take(SHORT_DESCRIPTION_MAX_CHARS)
        .collect::<String>()
        // Truncation can expose trailing whitespace; trim again so the result is a fixed point
        .trim_end()
        .to_string()
}

/// Exactly [`TEAM_SLOTS`] trimmed emails, padded with empty strings.
pub fn pad_emails(emails: &[String]) -> Vec<String> {
    pad_to_slots(emails, "")
}

/// Exactly [`TEAM_SLOTS`] roles, each either [`OWNER_TEAM_ROLE`] or [`DEFAULT_TEAM_ROLE`].
/// Blank, missing and unrecognized entries become [`DEFAULT_TEAM_ROLE`].
pub fn normalize_roles(roles: &[String]) -> Vec<String> {
    pad_to_slots(roles, DEFAULT_TEAM_ROLE)
        .into_iter()
        .map(|role| {
            if role.eq_ignore_ascii_case(OWNER_TEAM_ROLE) {
                OWNER_TEAM_ROLE.to_string()
            } else {
                DEFAULT_TEAM_ROLE.to_string()
            }
        })
        .collect()
}

fn pad_to_slots(values: &[String], fill: &str) -> Vec<String> {
    let mut out: Vec<String> = values
        .iter()
        .take(TEAM_SLOTS)
        .map(|v| {
            let v = v.trim();
            if v.is_empty() {
                fill.to_string()
            } else {
                v.to_string()
            }
        })
        .collect();
    out.resize(TEAM_SLOTS, fill.to_string());
    out
}
