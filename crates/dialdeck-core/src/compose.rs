// ── Campaign creation form ──
//
// Collects raw text-field input and composes it into a creation payload.
// Validation happens entirely locally; a form that fails to compose
// never produces an HTTP request.

use chrono::NaiveTime;
use thiserror::Error;

use dialdeck_api::{BusinessHours, CampaignCreate, RetryConfig};

/// Which phone-number source is active at submit time. The inactive
/// source is ignored even if populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhoneSource {
    #[default]
    Text,
    File,
}

/// Weekday names in the contract's wire spelling, in toggle order.
pub const WEEKDAYS: [&str; 7] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

/// A local validation failure. Composition stops at the first error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("campaign name must not be empty")]
    EmptyName,

    #[error("no phone numbers provided")]
    NoPhoneNumbers,

    #[error("{field} is not a valid number: {value:?}")]
    InvalidNumeric { field: &'static str, value: String },

    #[error("{field} is not a valid HH:MM time: {value:?}")]
    InvalidTime { field: &'static str, value: String },

    #[error("business hours enabled but no days selected")]
    NoDaysSelected,
}

/// Raw form state, all fields as the user typed them. Numeric fields are
/// kept as strings until composition so partial input never panics the
/// editor.
#[derive(Debug, Clone)]
pub struct CampaignForm {
    pub name: String,
    pub description: String,
    pub source: PhoneSource,
    /// Free-text entry, one number per line.
    pub phone_text: String,
    /// Contents of an uploaded file, same one-per-line format.
    pub file_content: String,
    pub concurrency_limit: String,
    pub priority: String,
    pub max_retries: String,
    pub callback_timeout_ms: String,
    pub business_hours_enabled: bool,
    pub start_time: String,
    pub end_time: String,
    pub timezone: String,
    /// Toggle state per [`WEEKDAYS`] entry.
    pub allowed_days: [bool; 7],
}

impl Default for CampaignForm {
    fn default() -> Self {
        let defaults = RetryConfig::default();
        Self {
            name: String::new(),
            description: String::new(),
            source: PhoneSource::Text,
            phone_text: String::new(),
            file_content: String::new(),
            concurrency_limit: "10".to_owned(),
            priority: "5".to_owned(),
            max_retries: defaults.max_retries.to_string(),
            callback_timeout_ms: defaults.callback_timeout_ms.to_string(),
            business_hours_enabled: false,
            start_time: "09:00".to_owned(),
            end_time: "18:00".to_owned(),
            timezone: "UTC".to_owned(),
            // Weekdays on, weekend off.
            allowed_days: [true, true, true, true, true, false, false],
        }
    }
}

impl CampaignForm {
    /// The phone numbers the active source would contribute right now.
    pub fn phone_numbers(&self) -> Vec<String> {
        let raw = match self.source {
            PhoneSource::Text => &self.phone_text,
            PhoneSource::File => &self.file_content,
        };
        split_numbers(raw)
    }

    /// Validate and compose the creation payload.
    pub fn compose(&self) -> Result<CampaignCreate, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyName);
        }

        let phone_numbers = self.phone_numbers();
        if phone_numbers.is_empty() {
            return Err(FormError::NoPhoneNumbers);
        }

        let concurrency_limit = parse_numeric(&self.concurrency_limit, "concurrency limit")?;
        let priority = parse_numeric(&self.priority, "priority")?;

        let retry_config = RetryConfig {
            max_retries: parse_numeric(&self.max_retries, "max retries")?,
            callback_timeout_ms: parse_numeric(&self.callback_timeout_ms, "callback timeout")?,
            ..RetryConfig::default()
        };

        let business_hours = if self.business_hours_enabled {
            Some(self.compose_business_hours()?)
        } else {
            None
        };

        let description = self.description.trim();
        Ok(CampaignCreate {
            name: name.to_owned(),
            description: (!description.is_empty()).then(|| description.to_owned()),
            phone_numbers,
            concurrency_limit,
            priority,
            retry_config,
            business_hours,
        })
    }

    fn compose_business_hours(&self) -> Result<BusinessHours, FormError> {
        let allowed_days = self
            .allowed_days
            .iter()
            .zip(WEEKDAYS)
            .filter_map(|(&on, day)| on.then_some(day))
            .collect::<Vec<_>>()
            .join(",");
        if allowed_days.is_empty() {
            return Err(FormError::NoDaysSelected);
        }

        Ok(BusinessHours {
            start_time: parse_time(&self.start_time, "start time")?,
            end_time: parse_time(&self.end_time, "end time")?,
            timezone: self.timezone.trim().to_owned(),
            allowed_days,
        })
    }
}

/// Split a one-number-per-line source: trim each line, discard blanks.
pub fn split_numbers(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_numeric<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T, FormError> {
    value
        .trim()
        .parse()
        .map_err(|_| FormError::InvalidNumeric {
            field,
            value: value.to_owned(),
        })
}

fn parse_time(value: &str, field: &'static str) -> Result<NaiveTime, FormError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| FormError::InvalidTime {
            field,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled_form() -> CampaignForm {
        CampaignForm {
            name: "Launch".to_owned(),
            phone_text: "+15551230001\n+15551230002".to_owned(),
            ..CampaignForm::default()
        }
    }

    #[test]
    fn text_source_splits_trims_and_discards_blanks() {
        let form = CampaignForm {
            phone_text: "+111\n\n+222\n ".to_owned(),
            ..filled_form()
        };
        assert_eq!(form.phone_numbers(), vec!["+111", "+222"]);
    }

    #[test]
    fn inactive_source_is_ignored_even_if_populated() {
        let form = CampaignForm {
            source: PhoneSource::File,
            file_content: "+333\n+444".to_owned(),
            phone_text: "+111".to_owned(),
            ..filled_form()
        };
        assert_eq!(form.phone_numbers(), vec!["+333", "+444"]);
    }

    #[test]
    fn empty_phone_set_blocks_composition() {
        let form = CampaignForm {
            phone_text: " \n\n ".to_owned(),
            ..filled_form()
        };
        assert_eq!(form.compose(), Err(FormError::NoPhoneNumbers));
    }

    #[test]
    fn empty_name_blocks_composition() {
        let form = CampaignForm {
            name: "  ".to_owned(),
            ..filled_form()
        };
        assert_eq!(form.compose(), Err(FormError::EmptyName));
    }

    #[test]
    fn numeric_fields_are_coerced() {
        let form = CampaignForm {
            concurrency_limit: " 25 ".to_owned(),
            priority: "8".to_owned(),
            max_retries: "6".to_owned(),
            callback_timeout_ms: "45000".to_owned(),
            ..filled_form()
        };

        let payload = form.compose().expect("composes");
        assert_eq!(payload.concurrency_limit, 25);
        assert_eq!(payload.priority, 8);
        assert_eq!(payload.retry_config.max_retries, 6);
        assert_eq!(payload.retry_config.callback_timeout_ms, 45_000);
        // Untyped retry fields keep their defaults.
        assert_eq!(payload.retry_config.callback_retry_delay_ms, 30_000);
    }

    #[test]
    fn bad_numeric_input_is_rejected_locally() {
        let form = CampaignForm {
            priority: "high".to_owned(),
            ..filled_form()
        };
        assert!(matches!(
            form.compose(),
            Err(FormError::InvalidNumeric {
                field: "priority",
                ..
            })
        ));
    }

    #[test]
    fn disabled_business_hours_never_reach_the_payload() {
        let mut form = filled_form();
        form.business_hours_enabled = true;
        form.business_hours_enabled = false;

        let payload = form.compose().expect("composes");
        assert!(payload.business_hours.is_none());

        let json = serde_json::to_value(&payload).expect("serializes");
        assert!(json.get("businessHours").is_none(), "no key, not null");
    }

    #[test]
    fn enabled_business_hours_join_days_with_commas() {
        let form = CampaignForm {
            business_hours_enabled: true,
            allowed_days: [true, false, true, false, false, false, false],
            start_time: "08:30".to_owned(),
            end_time: "17:00".to_owned(),
            ..filled_form()
        };

        let payload = form.compose().expect("composes");
        let hours = payload.business_hours.expect("present");
        assert_eq!(hours.allowed_days, "MONDAY,WEDNESDAY");
        assert_eq!(hours.start_time.to_string(), "08:30:00");
    }

    #[test]
    fn no_days_selected_is_an_error() {
        let form = CampaignForm {
            business_hours_enabled: true,
            allowed_days: [false; 7],
            ..filled_form()
        };
        assert_eq!(form.compose(), Err(FormError::NoDaysSelected));
    }

    #[test]
    fn invalid_time_is_rejected() {
        let form = CampaignForm {
            business_hours_enabled: true,
            start_time: "9am".to_owned(),
            ..filled_form()
        };
        assert!(matches!(
            form.compose(),
            Err(FormError::InvalidTime {
                field: "start time",
                ..
            })
        ));
    }
}
