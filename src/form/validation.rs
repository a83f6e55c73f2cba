use std::collections::BTreeMap;

use chrono::NaiveDate;

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::{DateOfBirth, EmailAddress};
use crate::form::{Field, FormValues, FormVariant};

/// Minimum message length, in user-perceived characters
pub const MIN_MESSAGE_LEN: usize = 10;

/// A check on a single field's raw value. The date is "today" at submission.
pub type Predicate = fn(&str, NaiveDate) -> bool;

/// A predicate and the message reported when it fails
#[derive(Clone, Copy)]
pub struct Rule {
    pub check: Predicate,
    pub message: &'static str,
}

impl Rule {
    const fn new(check: Predicate, message: &'static str) -> Self {
        Self { check, message }
    }
}

/// Ordered rules per field. Fields are checked independently, and a field
/// reports the message of its first failing rule.
pub struct RuleSet {
    rules: Vec<(Field, Vec<Rule>)>,
}

impl RuleSet {
    /// The rules of a form variant
    pub fn for_variant(variant: FormVariant) -> Self {
        let rules = match variant {
            FormVariant::Short => vec![
                (Field::Name, vec![Rule::new(present, "Name is required")]),
                (
                    Field::Email,
                    vec![
                        Rule::new(present, "Email is required"),
                        Rule::new(email_address, "Invalid email address"),
                    ],
                ),
                (
                    Field::Message,
                    vec![
                        Rule::new(present, "Message is required"),
                        Rule::new(min_message_len, "Message must be at least 10 characters"),
                    ],
                ),
            ],
            FormVariant::Extended => vec![
                (Field::Name, vec![Rule::new(present, "Required")]),
                (Field::Surname, vec![Rule::new(present, "Required")]),
                (
                    Field::Email,
                    vec![
                        Rule::new(present, "Required"),
                        Rule::new(email_address, "Invalid email"),
                    ],
                ),
                (Field::Country, vec![Rule::new(present, "Required")]),
                (
                    Field::Dob,
                    vec![
                        Rule::new(present, "Required"),
                        Rule::new(date, "Invalid date"),
                        Rule::new(of_age, "You must be at least 16 years old"),
                    ],
                ),
                (
                    Field::Message,
                    vec![
                        Rule::new(present, "Required"),
                        Rule::new(min_message_len, "At least 10 characters"),
                    ],
                ),
            ],
        };

        Self { rules }
    }

    /// Evaluate every field's rules against `values`
    pub fn validate(&self, values: &FormValues, today: NaiveDate) -> ValidationErrors {
        let errors = self
            .rules
            .iter()
            .filter_map(|(field, rules)| {
                let value = values.get(*field);
                rules
                    .iter()
                    .find(|rule| !(rule.check)(value, today))
                    .map(|rule| (*field, rule.message))
            })
            .collect();

        ValidationErrors(errors)
    }

    /// The fields this rule set checks
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.rules.iter().map(|(field, _)| *field)
    }
}

fn present(value: &str, _: NaiveDate) -> bool {
    !value.trim().is_empty()
}

fn email_address(value: &str, _: NaiveDate) -> bool {
    value.parse::<EmailAddress>().is_ok()
}

fn min_message_len(value: &str, _: NaiveDate) -> bool {
    value.trim().graphemes(true).count() >= MIN_MESSAGE_LEN
}

fn date(value: &str, _: NaiveDate) -> bool {
    value.parse::<DateOfBirth>().is_ok()
}

fn of_age(value: &str, today: NaiveDate) -> bool {
    value
        .parse::<DateOfBirth>()
        .map(|dob| dob.is_of_age_on(today))
        .unwrap_or(false)
}

/// Error message per failing field; empty when submission may proceed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, &'static str>);

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn remove(&mut self, field: Field) -> Option<&'static str> {
        self.0.remove(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}
