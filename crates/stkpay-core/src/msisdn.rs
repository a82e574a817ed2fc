//! # MSISDN Normalization
//!
//! Mobile-money charges are addressed by MSISDN: the full international
//! number, country code followed by the subscriber number, with no leading
//! zero and no plus sign.
//!
//! Subscribers type their number in local form (`0712 345 678`), so every
//! number is normalized before validation:
//!
//! 1. All whitespace is removed.
//! 2. A single leading trunk-prefix digit (`0`) is replaced by the country
//!    code. The remaining digits are left untouched.
//! 3. Every other form passes through unchanged and is left to validation.
//!    In particular `+254...` is rejected rather than silently repaired.
//!
//! Validation then requires exactly `country_code` followed by
//! `subscriber_digits` ASCII digits (`^254\d{9}$` for Kenya).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Numbering rules for one mobile-money market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsisdnRules {
    /// International dialling code without `+` (e.g. `"254"`).
    pub country_code: String,
    /// Number of digits following the country code.
    pub subscriber_digits: usize,
    /// National trunk prefix replaced by the country code (e.g. `'0'`).
    pub trunk_prefix: char,
}

impl MsisdnRules {
    /// Kenyan numbering plan: `254` followed by 9 digits, trunk prefix `0`.
    pub fn kenya() -> Self {
        Self {
            country_code: "254".to_string(),
            subscriber_digits: 9,
            trunk_prefix: '0',
        }
    }

    /// Strip whitespace and rewrite a leading trunk prefix into the
    /// country code.
    pub fn normalize(&self, raw: &str) -> String {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.strip_prefix(self.trunk_prefix) {
            Some(rest) => format!("{}{}", self.country_code, rest),
            None => compact,
        }
    }

    /// Check an already-normalized number against the market pattern.
    pub fn is_valid(&self, normalized: &str) -> bool {
        match normalized.strip_prefix(self.country_code.as_str()) {
            Some(subscriber) => {
                subscriber.len() == self.subscriber_digits
                    && subscriber.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        }
    }

    fn expected_shape(&self) -> String {
        format!(
            "{} followed by {} digits",
            self.country_code, self.subscriber_digits
        )
    }
}

impl Default for MsisdnRules {
    fn default() -> Self {
        Self::kenya()
    }
}

/// Normalize a phone number under the default (Kenyan) rules.
///
/// `normalize("0712345678") == "254712345678"`.
pub fn normalize(raw: &str) -> String {
    MsisdnRules::kenya().normalize(raw)
}

/// A normalized, validated MSISDN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Msisdn {
    value: String,
    country_code_len: usize,
}

impl Msisdn {
    /// Normalize and validate under the default (Kenyan) rules.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMsisdn`] if the normalized number
    /// does not match `254` followed by 9 digits.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::parse_with(raw, &MsisdnRules::kenya())
    }

    /// Normalize and validate under explicit market rules.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMsisdn`] if the normalized number
    /// does not match the rules.
    pub fn parse_with(raw: &str, rules: &MsisdnRules) -> Result<Self, ValidationError> {
        let normalized = rules.normalize(raw);
        if !rules.is_valid(&normalized) {
            return Err(ValidationError::InvalidMsisdn {
                raw: raw.to_string(),
                normalized,
                expected: rules.expected_shape(),
            });
        }
        Ok(Self {
            value: normalized,
            country_code_len: rules.country_code.len(),
        })
    }

    /// The full international number, e.g. `"254712345678"`.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The digits after the country code, e.g. `"712345678"`.
    pub fn subscriber_number(&self) -> &str {
        &self.value[self.country_code_len..]
    }
}

impl std::fmt::Display for Msisdn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl Serialize for Msisdn {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for Msisdn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
