//! Prelude generation for dot-sourced script functions
//!
//! The automation script's functions read a set of globals and a handful of control
//! objects left over from its desktop UI. The prelude recreates those from the form so a
//! function can be called directly. Every operator value goes through [`PsLiteral`].

use crate::escape::{PsLiteral, PsScript};
use crate::form::NormalizedForm;

/// Placeholder constructors shaped like the desktop controls the script touches.
/// Setting `.Text` or `.Enabled` on them is harmless.
const CONTROL_CONSTRUCTORS: &str = r#"function New-MockTextBox([string]$text) {
    return [pscustomobject]@{ Text = $text; ReadOnly = $false }
}
function New-MockCheckBox([bool]$checked, [bool]$enabled=$true, [string]$text='') {
    return [pscustomobject]@{ Checked = $checked; Enabled = $enabled; Text = $text }
}
function New-MockButton([string]$text='') {
    return [pscustomobject]@{ Text = $text; Enabled = $true; ForeColor = ''; Visible = $true }
}
function New-MockLabel([string]$text='') {
    return [pscustomobject]@{ Text = $text; ForeColor = ''; Visible = $true }
}
function New-MockCombo([string]$selected) {
    return [pscustomobject]@{ SelectedItem = $selected }
}
"#;

const BUTTONS: &[(&str, &str)] = &[
    ("OpenInstallLocationButton", "Browse Install Documents Now"),
    ("CreateSCButton", "Create Shortcut to KP"),
    ("CreateONButton", "Create OneNote Page"),
    ("BrowsePIButton", "Browse Project Insight"),
    ("SubmitButton", "Submit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreludeOptions {
    /// Emit the placeholder control section
    pub control_shims: bool,
}

impl Default for PreludeOptions {
    fn default() -> Self {
        Self {
            control_shims: true,
        }
    }
}

/// Build the prelude text for `form`. Pure: identical input gives identical output.
pub fn build_prelude(form: &NormalizedForm, options: PreludeOptions) -> PsScript {
    let so = PsLiteral::new(&form.sales_order);
    let cust = PsLiteral::new(&form.customer_name);
    let sdm = PsLiteral::new(&form.sdm_name);
    let desc = PsLiteral::new(&form.short_description);
    let channel = PsLiteral::new(&form.teams_channel_name());
    let adv = &form.advanced;

    let mut script = PsScript::new();

    script.line("# Required variables");
    script.line_with("$global:SoNum = ", &so, "");
    script.line_with("$global:CustName = ", &cust, "");
    script.line_with("$global:SdmName = ", &sdm, "");
    script.line_with("$global:ProjectShortDesc = ", &desc, "");
    script.line_with("$global:TeamsChannelName = ", &channel, "");

    script.line("# OneNote page fields");
    for (name, value) in [
        ("TimeTrackingCaseNumber", &adv.time_tracking_case),
        ("ExternalTeamsLink", &adv.external_teams_link),
        ("PrimaryDatacenter", &adv.primary_datacenter),
        ("DRaaSDatacenter", &adv.draas_datacenter),
        ("TargetCompletionDate", &adv.target_completion_date),
        ("DRRehearsalDate", &adv.dr_rehearsal_date),
        ("MigrationCutoverDate", &adv.migration_cutover_date),
    ] {
        script.line_with(format!("$global:{} = ", name), &PsLiteral::new(value), "");
    }

    script.line_with(
        "$global:SdmQuickStartPiKey = ",
        &PsLiteral::new(&form.pi_api_key),
        "",
    );

    if !form.pi_url_override.is_empty() {
        script.line_with(
            "$global:ProjectInsightUrl = ",
            &PsLiteral::new(&form.pi_url_override),
            "",
        );
    }

    if options.control_shims {
        append_control_shims(&mut script, form, &so, &cust, &sdm, &desc, &channel);
    }

    script
}

fn append_control_shims(
    script: &mut PsScript,
    form: &NormalizedForm,
    so: &PsLiteral,
    cust: &PsLiteral,
    sdm: &PsLiteral,
    desc: &PsLiteral,
    channel: &PsLiteral,
) {
    script.line("# Placeholder controls");
    script.code(CONTROL_CONSTRUCTORS);

    script.line_with("$SalesOrderTextBox = New-MockTextBox(", so, ")");
    script.line_with("$CustomerNameTextBox = New-MockTextBox(", cust, ")");
    script.line_with("$ProjectShortDescTextBox = New-MockTextBox(", desc, ")");
    script.line_with("$SdmNameTextBox = New-MockTextBox(", sdm, ")");
    script.line_with(
        "$PINumberTextBox = New-MockTextBox(",
        &PsLiteral::new(&form.pi_number),
        ")",
    );
    script.line_with(
        "$PMNameTextBox = New-MockTextBox(",
        &PsLiteral::new(&form.pm_name),
        ")",
    );
    script.line_with("$TeamsChannelNameTextBox = New-MockTextBox(", channel, ")");

    for (name, checked) in [
        ("ProdCheckBox", form.production),
        ("DRaaSCheckBox", form.draas),
        ("BaaSCheckBox", form.baas),
        ("CopySEDTCheckBox", form.copy_sedt),
    ] {
        script.line(format!(
            "${} = New-MockCheckBox({}, $true)",
            name,
            ps_bool(checked)
        ));
    }

    script.line("$SOValid = New-MockLabel('')");
    script.line("$PIStatusLabel = New-MockLabel('')");

    for (name, label) in BUTTONS {
        script.line_with(
            format!("${} = New-MockButton(", name),
            &PsLiteral::new(label),
            ")",
        );
    }

    for (slot, email) in form.emails().iter().enumerate() {
        script.line_with(
            format!("$TeamsEmailTextBox{} = New-MockTextBox(", slot + 1),
            &PsLiteral::new(email),
            ")",
        );
    }
    for (slot, role) in form.roles().iter().enumerate() {
        script.line_with(
            format!("$TeamsRoleComboBox{} = New-MockCombo(", slot + 1),
            &PsLiteral::new(role),
            ")",
        );
    }

    script.line("$TabControl1 = [pscustomobject]@{ SelectedTab = $null }");
    script.line("$MainTab = $null");
}

fn ps_bool(value: bool) -> &'static str {
    if value {
        "$true"
    } else {
        "$false"
    }
}
