//! Role-specific profile edit forms.
//!
//! # Responsibilities
//! - Describe the editable fields of each role
//! - Seed a form from the cached user
//! - Reject unknown fields, bad choices and missing required values

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::auth::Role;
use crate::error::{ClientError, Result};
use crate::session::User;

/// Input kind of a profile field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Email,
    Phone,
    Date,
    Number,
    Choice(&'static [&'static str]),
}

/// One editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: false,
    }
}

const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: true,
    }
}

pub const POSITIONS: &[&str] = &["goalkeeper", "defender", "midfielder", "forward", "striker"];

pub const COACHING_LEVELS: &[&str] = &[
    "youth",
    "amateur",
    "semi-professional",
    "professional",
    "international",
];

pub const LICENSE_LEVELS: &[&str] = &["uefa-c", "uefa-b", "uefa-a", "uefa-pro", "other"];

const PLAYER_FIELDS: &[FieldSpec] = &[
    required("fullName", "Full Name", FieldKind::Text),
    field("userName", "User Name", FieldKind::Text),
    required("email", "Email Address", FieldKind::Email),
    field("phone", "Phone Number", FieldKind::Phone),
    field("location", "Location", FieldKind::Text),
    field("dateOfBirth", "Date of Birth", FieldKind::Date),
    field("position", "Position", FieldKind::Choice(POSITIONS)),
    field("height", "Height (cm)", FieldKind::Number),
    field("weight", "Weight", FieldKind::Number),
    field("clubTeam", "Club Team", FieldKind::Text),
    field("age", "Age (Years)", FieldKind::Number),
    field("bio", "Bio", FieldKind::LongText),
];

const SCOUT_FIELDS: &[FieldSpec] = &[
    required("fullName", "Full Name", FieldKind::Text),
    required("userName", "Username", FieldKind::Text),
    required("organisation", "Organization", FieldKind::Text),
    field("phone", "Phone Number", FieldKind::Phone),
    required("email", "Email", FieldKind::Email),
    required("location", "Location", FieldKind::Text),
    field("specialization", "Specialization", FieldKind::Text),
    field("experience", "Years of Experience", FieldKind::Number),
    field("certifications", "Certifications", FieldKind::LongText),
    field("bio", "Bio", FieldKind::LongText),
];

const COACH_FIELDS: &[FieldSpec] = &[
    required("name", "Full Name", FieldKind::Text),
    required("email", "Email Address", FieldKind::Email),
    field("phone", "Phone Number", FieldKind::Phone),
    field("location", "Location", FieldKind::Text),
    field("currentTeam", "Current Team/Club", FieldKind::Text),
    field("experience", "Years of Experience", FieldKind::Number),
    field("coachingLevel", "Coaching Level", FieldKind::Choice(COACHING_LEVELS)),
    field("licenseLevel", "License Level", FieldKind::Choice(LICENSE_LEVELS)),
    field("bio", "Professional Bio", FieldKind::LongText),
    field("philosophy", "Coaching Philosophy", FieldKind::LongText),
    field("specializations", "Specializations", FieldKind::LongText),
    field("achievements", "Achievements", FieldKind::LongText),
    field("formationsUsed", "Preferred Formations", FieldKind::Text),
    field("languagesSpoken", "Languages Spoken", FieldKind::Text),
];

/// Editable fields for `role`, in display order.
pub fn fields_for(role: Role) -> &'static [FieldSpec] {
    match role {
        Role::Player => PLAYER_FIELDS,
        Role::Scout => SCOUT_FIELDS,
        Role::Coach => COACH_FIELDS,
    }
}

/// A profile edit in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileForm {
    role: Role,
    values: BTreeMap<&'static str, String>,
}

impl ProfileForm {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            values: BTreeMap::new(),
        }
    }

    /// Form pre-filled with whatever the cached user already has.
    pub fn for_user(user: &User) -> Self {
        let mut form = Self::new(user.role);
        for spec in fields_for(user.role) {
            if let Some(value) = user.field(spec.name) {
                form.values.insert(spec.name, value);
            }
        }
        form
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Set a field. Empty values clear it.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let spec = fields_for(self.role)
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| {
                ClientError::Validation(format!("Unknown field '{name}' for {} profile", self.role))
            })?;

        let value = value.trim();
        if value.is_empty() {
            self.values.remove(spec.name);
            return Ok(());
        }

        match spec.kind {
            FieldKind::Choice(options) if !options.contains(&value) => {
                return Err(ClientError::Validation(format!(
                    "{} must be one of: {}",
                    spec.label,
                    options.join(", ")
                )));
            }
            FieldKind::Number if value.parse::<f64>().is_err() => {
                return Err(ClientError::Validation(format!("{} must be a number", spec.label)));
            }
            FieldKind::Email if !super::auth::is_valid_email(value) => {
                return Err(ClientError::Validation(
                    "Please enter a valid email address".to_string(),
                ));
            }
            _ => {}
        }

        self.values.insert(spec.name, value.to_string());
        Ok(())
    }

    /// Apply `key=value` assignments in order.
    pub fn apply_assignments<'a, I>(&mut self, assignments: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for raw in assignments {
            let (key, value) = raw.split_once('=').ok_or_else(|| {
                ClientError::Validation(format!("Expected key=value, got '{raw}'"))
            })?;
            self.set(key.trim(), value)?;
        }
        Ok(())
    }

    /// Check required fields before submit.
    pub fn validate(&self) -> Result<()> {
        match fields_for(self.role)
            .iter()
            .find(|s| s.required && !self.values.contains_key(s.name))
        {
            Some(spec) => Err(ClientError::Validation(format!("{} is required", spec.label))),
            None => Ok(()),
        }
    }

    /// The request body: every field of the role, blanks as empty strings.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = fields_for(self.role)
            .iter()
            .map(|spec| {
                let value = self.values.get(spec.name).cloned().unwrap_or_default();
                (spec.name.to_string(), Value::String(value))
            })
            .collect();
        Value::Object(map)
    }
}
