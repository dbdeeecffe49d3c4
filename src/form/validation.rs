//! Pre-dispatch validation
//!
//! Each action declares the [`Requirement`]s it needs. A failing requirement stops the
//! action before any process is spawned.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use super::normalize::NormalizedForm;

/// `T` followed by exactly eight ASCII digits, either case.
static SALES_ORDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^T[0-9]{8}$").expect("Invalid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    SalesOrder,
    CustomerName,
    WorkbookType,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Sales order must be 'T' followed by 8 digits (ex: T12345678).")]
    InvalidSalesOrder,
    #[error("Customer name is required.")]
    MissingCustomerName,
    #[error("Select at least one Workbook Type (Production / DRaaS / BaaS).")]
    NoWorkbookType,
}

pub fn is_valid_sales_order(value: &str) -> bool {
    SALES_ORDER_RE.is_match(value)
}

/// Check `requirements` in order and report the first one that fails.
pub fn validate(form: &NormalizedForm, requirements: &[Requirement]) -> Result<(), ValidationError> {
    for requirement in requirements {
        match requirement {
            Requirement::SalesOrder if !is_valid_sales_order(&form.sales_order) => {
                return Err(ValidationError::InvalidSalesOrder)
            }
            Requirement::CustomerName if form.customer_name.is_empty() => {
                return Err(ValidationError::MissingCustomerName)
            }
            Requirement::WorkbookType if !form.any_workbook_type() => {
                return Err(ValidationError::NoWorkbookType)
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{normalize, FormState};

    const SUBMIT: &[Requirement] = &[
        Requirement::SalesOrder,
        Requirement::CustomerName,
        Requirement::WorkbookType,
    ];

    fn valid_form() -> FormState {
        let mut form = FormState::new("jdoe");
        form.sales_order = "T12345678".into();
        form.customer_name = "Acme".into();
        form.production = true;
        form
    }

    #[test]
    fn test_sales_order_acceptance() {
        assert!(is_valid_sales_order("T12345678"));
        assert!(is_valid_sales_order("t12345678"));
        assert!(!is_valid_sales_order("T1234567"));
        assert!(!is_valid_sales_order("12345678T"));
        assert!(!is_valid_sales_order("T123456789"));
        assert!(!is_valid_sales_order("T1234567a"));
        assert!(!is_valid_sales_order(""));
        // Non-ASCII digits don't count
        assert!(!is_valid_sales_order("T١٢٣٤٥٦٧٨"));
    }

    #[test]
    fn test_sales_order_trimmed_before_check() {
        let mut form = valid_form();
        form.sales_order = "  T12345678 ".into();
        assert_eq!(validate(&normalize(&form), SUBMIT), Ok(()));
    }

    #[test]
    fn test_submit_gating() {
        assert_eq!(validate(&normalize(&valid_form()), SUBMIT), Ok(()));

        let mut bad_so = valid_form();
        bad_so.sales_order = "T1234567".into();
        assert_eq!(
            validate(&normalize(&bad_so), SUBMIT),
            Err(ValidationError::InvalidSalesOrder)
        );

        let mut no_customer = valid_form();
        no_customer.customer_name = "   ".into();
        assert_eq!(
            validate(&normalize(&no_customer), SUBMIT),
            Err(ValidationError::MissingCustomerName)
        );

        let mut no_workbook = valid_form();
        no_workbook.production = false;
        assert_eq!(
            validate(&normalize(&no_workbook), SUBMIT),
            Err(ValidationError::NoWorkbookType)
        );
    }

    #[test]
    fn test_any_single_workbook_type_is_enough() {
        for pick in 0..3 {
            let mut form = valid_form();
            form.production = pick == 0;
            form.draas = pick == 1;
            form.baas = pick == 2;
            assert_eq!(validate(&normalize(&form), SUBMIT), Ok(()));
        }
    }

    #[test]
    fn test_no_requirements_always_passes() {
        assert_eq!(validate(&normalize(&FormState::default()), &[]), Ok(()));
    }

    #[test]
    fn test_first_failure_reported() {
        let form = FormState::default();
        assert_eq!(
            validate(&normalize(&form), SUBMIT),
            Err(ValidationError::InvalidSalesOrder)
        );
    }
}
