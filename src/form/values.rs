use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single input of the contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Surname,
    Email,
    Country,
    Dob,
    Message,
}

impl Field {
    /// Key used for the field in relay template params
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Surname => "surname",
            Field::Email => "email",
            Field::Country => "country",
            Field::Dob => "dob",
            Field::Message => "message",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Surname => "Surname",
            Field::Email => "Email",
            Field::Country => "Country",
            Field::Dob => "Date of Birth",
            Field::Message => "Message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which fields a form instance collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    /// Name, email and message
    #[default]
    Short,
    /// Adds surname, country and date of birth
    Extended,
}

impl FormVariant {
    /// The variant's fields in presentation order
    pub fn fields(&self) -> &'static [Field] {
        match self {
            FormVariant::Short => &[Field::Name, Field::Email, Field::Message],
            FormVariant::Extended => &[
                Field::Name,
                Field::Surname,
                Field::Country,
                Field::Dob,
                Field::Email,
                Field::Message,
            ],
        }
    }
}

/// Raw text entered into each field. Every field starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub country: String,
    pub dob: String,
    pub message: String,
}

impl FormValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Surname => &self.surname,
            Field::Email => &self.email,
            Field::Country => &self.country,
            Field::Dob => &self.dob,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Surname => &mut self.surname,
            Field::Email => &mut self.email,
            Field::Country => &mut self.country,
            Field::Dob => &mut self.dob,
            Field::Message => &mut self.message,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The payload for the relay template, limited to the variant's fields.
    ///
    /// Values are trimmed the same way validation sees them.
    pub fn template_params(&self, variant: FormVariant) -> TemplateParams {
        let params = variant
            .fields()
            .iter()
            .map(|field| (field.as_str(), self.get(*field).trim().to_string()))
            .collect();
        TemplateParams(params)
    }
}

/// Key/value pairs matching the field names the relay template expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateParams(BTreeMap<&'static str, String>);

impl TemplateParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
