//! Validated value types shared across the vitals workspace.
//!
//! Each type here can only be constructed through a checking constructor, so a value that
//! exists has already passed its rule. Deserialization goes through the same constructors.

use std::fmt;

/// Errors that can occur when creating validated value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
    /// The input was not `<2-3 digits>/<2-3 digits>`
    #[error("blood pressure must be in format systolic/diastolic")]
    BloodPressureFormat,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText`, trimming the input.
    ///
    /// Returns `Err(TypeError::Empty)` if nothing but whitespace remains.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Opaque patient identifier assigned by the backend store.
///
/// The store currently emits integers; the client never does arithmetic on them, so both JSON
/// numbers and strings are accepted and held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatientId(String);

impl PatientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for PatientId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl std::str::FromStr for PatientId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = NonEmptyText::new(s)?;
        Ok(Self(text.as_str().to_owned()))
    }
}

impl serde::Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct IdVisitor;

        impl serde::de::Visitor<'_> for IdVisitor {
            type Value = PatientId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a patient id as an integer or string")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(PatientId::from(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(PatientId(v.to_string()))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Blood pressure as entered: `<systolic>/<diastolic>`, each 2-3 ASCII digits.
///
/// The original text is kept verbatim. The two components are decoded once here so nothing
/// downstream has to split or parse the string again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloodPressure {
    text: String,
    systolic: u16,
    diastolic: u16,
}

impl BloodPressure {
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        fn component(part: &str) -> Option<u16> {
            let ok = (2..=3).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit());
            if !ok {
                return None;
            }
            part.parse().ok()
        }

        let (sys, dia) = input
            .split_once('/')
            .ok_or(TypeError::BloodPressureFormat)?;
        match (component(sys), component(dia)) {
            (Some(systolic), Some(diastolic)) => Ok(Self {
                text: input.to_owned(),
                systolic,
                diastolic,
            }),
            _ => Err(TypeError::BloodPressureFormat),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn systolic(&self) -> u16 {
        self.systolic
    }

    pub fn diastolic(&self) -> u16 {
        self.diastolic
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl serde::Serialize for BloodPressure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> serde::Deserialize<'de> for BloodPressure {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BloodPressure::parse(&s).map_err(serde::de::Error::custom)
    }
}
