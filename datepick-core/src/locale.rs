//! Locale resolution and localized labels.
//!
//! Tags are accepted in either BCP 47 (`fr-FR`) or POSIX (`fr_FR`) form.
//! A bare language (`de`) resolves to its canonical territory (`de_DE`).

use chrono::{Duration, Locale, Months, NaiveDate, NaiveDateTime, Weekday};
use tracing::warn;

use crate::constants::DEFAULT_LOCALE;
use crate::error::{DatePickError, DatePickResult};

// Label sources; 2024-01-07 was a Sunday.
const REFERENCE_SUNDAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 7).expect("valid date");
const REFERENCE_JANUARY: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");

#[derive(Debug, Clone)]
pub struct PickerLocale {
    tag: String,
    locale: Locale,
}

impl PickerLocale {
    pub fn resolve(tag: &str) -> DatePickResult<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(DEFAULT_LOCALE) {
            return Ok(Self::default());
        }

        let posix = trimmed.replace('-', "_");
        let locale = Locale::try_from(posix.as_str())
            .or_else(|_| {
                let lang = posix.to_ascii_lowercase();
                Locale::try_from(format!("{lang}_{}", lang.to_ascii_uppercase()).as_str())
            })
            .map_err(|_| DatePickError::UnknownLocale(tag.to_string()))?;

        Ok(PickerLocale {
            tag: trimmed.to_string(),
            locale,
        })
    }

    /// Resolve `tag`, falling back to the default locale when it is unknown.
    pub fn resolve_or_default(tag: &str) -> Self {
        Self::resolve(tag).unwrap_or_else(|e| {
            warn!("{e}; falling back to the default locale");
            Self::default()
        })
    }

    /// The tag as supplied by the consumer.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn format_date(&self, date: NaiveDate, fmt: &str) -> String {
        self.format(date.and_time(chrono::NaiveTime::MIN), fmt)
    }

    pub fn format(&self, datetime: NaiveDateTime, fmt: &str) -> String {
        datetime
            .and_utc()
            .format_localized(fmt, self.locale)
            .to_string()
    }

    /// Abbreviated weekday name, e.g. `Mon`.
    pub fn weekday_short(&self, weekday: Weekday) -> String {
        let date = REFERENCE_SUNDAY + Duration::days(weekday.num_days_from_sunday().into());
        self.format_date(date, "%a")
    }

    /// Full month name for a zero-based month index.
    pub fn month_long(&self, month0: u32) -> String {
        self.format_date(REFERENCE_JANUARY + Months::new(month0 % 12), "%B")
    }
}

impl Default for PickerLocale {
    fn default() -> Self {
        PickerLocale {
            tag: DEFAULT_LOCALE.to_string(),
            locale: Locale::POSIX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_uses_english_labels() {
        let locale = PickerLocale::resolve("default").unwrap();
        assert_eq!(locale.weekday_short(Weekday::Sun), "Sun");
        assert_eq!(locale.weekday_short(Weekday::Sat), "Sat");
        assert_eq!(locale.month_long(2), "March");
        assert_eq!(locale.month_long(11), "December");
        assert_eq!(locale.month_long(12), "January");
    }

    #[test]
    fn test_resolves_bcp47_and_bare_language_tags() {
        let fr = PickerLocale::resolve("fr-FR").unwrap();
        assert_eq!(fr.month_long(0), "janvier");

        let de = PickerLocale::resolve("de").unwrap();
        assert_eq!(de.month_long(2), "März");
        assert_eq!(de.tag(), "de");
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        assert!(PickerLocale::resolve("xx-NOPE").is_err());
        let fallback = PickerLocale::resolve_or_default("xx-NOPE");
        assert_eq!(fallback.tag(), DEFAULT_LOCALE);
    }
}
