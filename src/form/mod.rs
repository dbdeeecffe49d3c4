//! Operator form state
//!
//! - `state` - the raw field values as edited in the page
//! - `normalize` - trimming, truncation and roster padding
//! - `validation` - pre-dispatch checks that gate actions

mod normalize;
mod state;
mod validation;

pub use normalize::{
    normalize, normalize_roles, normalize_short_description, pad_emails, NormalizedForm,
    DEFAULT_TEAM_ROLE, SHORT_DESCRIPTION_MAX_CHARS, TEAM_SLOTS,
};
pub use state::{default_sdm_name, AdvancedFields, FormState};
pub use validation::{is_valid_sales_order, validate, Requirement, ValidationError};
