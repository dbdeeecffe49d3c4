//! Action triggers exposed in the page
//!
//! Each trigger maps to one action identifier understood by the automation script and
//! declares what the form must satisfy before it is dispatched.

use serde::{Deserialize, Serialize};

use crate::form::{Requirement, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptAction {
    #[serde(rename = "ValidateSalesNumber")]
    ValidateSalesNumber,
    #[serde(rename = "SdmSubmit")]
    Submit,
    #[serde(rename = "OpenInstallLocation")]
    OpenInstallLocation,
    #[serde(rename = "CreateSCButton")]
    CreateShortcut,
    #[serde(rename = "CreateOneNoteSection")]
    CreateOneNoteSection,
    #[serde(rename = "BrowsePI")]
    BrowseProjectInsight,
    #[serde(rename = "CreateTeam")]
    CreateTeam,
}

impl ScriptAction {
    pub const ALL: [ScriptAction; 7] = [
        ScriptAction::ValidateSalesNumber,
        ScriptAction::CreateOneNoteSection,
        ScriptAction::CreateShortcut,
        ScriptAction::Submit,
        ScriptAction::BrowseProjectInsight,
        ScriptAction::OpenInstallLocation,
        ScriptAction::CreateTeam,
    ];

    /// Identifier passed as `-Action`, and the function name in dot-source mode
    pub fn identifier(self) -> &'static str {
        match self {
            ScriptAction::ValidateSalesNumber => "ValidateSalesNumber",
            ScriptAction::Submit => "SdmSubmit",
            ScriptAction::OpenInstallLocation => "OpenInstallLocation",
            ScriptAction::CreateShortcut => "CreateSCButton",
            ScriptAction::CreateOneNoteSection => "CreateOneNoteSection",
            ScriptAction::BrowseProjectInsight => "BrowsePI",
            ScriptAction::CreateTeam => "CreateTeam",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScriptAction::ValidateSalesNumber => "Validate",
            ScriptAction::Submit => "Submit",
            ScriptAction::OpenInstallLocation => "Browse Install Documents",
            ScriptAction::CreateShortcut => "Create Shortcut to KP",
            ScriptAction::CreateOneNoteSection => "Create OneNote Page",
            ScriptAction::BrowseProjectInsight => "Browse Project Insight",
            ScriptAction::CreateTeam => "Create Team",
        }
    }

    pub fn requirements(self) -> &'static [Requirement] {
        match self {
            ScriptAction::ValidateSalesNumber
            | ScriptAction::OpenInstallLocation
            | ScriptAction::CreateShortcut => &[Requirement::SalesOrder],
            ScriptAction::CreateOneNoteSection => {
                &[Requirement::SalesOrder, Requirement::CustomerName]
            }
            ScriptAction::Submit => &[
                Requirement::SalesOrder,
                Requirement::CustomerName,
                Requirement::WorkbookType,
            ],
            ScriptAction::BrowseProjectInsight | ScriptAction::CreateTeam => &[],
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.identifier().eq_ignore_ascii_case(identifier))
    }

    /// Message shown in the activity log when validation stops this action
    pub fn rejection_message(self, error: &ValidationError) -> String {
        match (self, error) {
            (ScriptAction::CreateOneNoteSection, ValidationError::MissingCustomerName) => {
                "Customer name is required before creating OneNote content.".to_string()
            }
            _ => error.to_string(),
        }
    }
}

impl std::fmt::Display for ScriptAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_round_trip() {
        for action in ScriptAction::ALL {
            assert_eq!(ScriptAction::from_identifier(action.identifier()), Some(action));
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.identifier()));
        }
        assert_eq!(
            ScriptAction::from_identifier("sdmsubmit"),
            Some(ScriptAction::Submit)
        );
        assert_eq!(ScriptAction::from_identifier("Exit"), None);
    }

    #[test]
    fn test_requirements_table() {
        assert_eq!(ScriptAction::Submit.requirements().len(), 3);
        assert_eq!(
            ScriptAction::CreateShortcut.requirements(),
            &[Requirement::SalesOrder]
        );
        assert!(ScriptAction::CreateTeam.requirements().is_empty());
        assert!(ScriptAction::BrowseProjectInsight.requirements().is_empty());
    }

    #[test]
    fn test_onenote_rejection_message() {
        assert_eq!(
            ScriptAction::CreateOneNoteSection
                .rejection_message(&ValidationError::MissingCustomerName),
            "Customer name is required before creating OneNote content."
        );
        assert_eq!(
            ScriptAction::Submit.rejection_message(&ValidationError::MissingCustomerName),
            "Customer name is required."
        );
    }
}
