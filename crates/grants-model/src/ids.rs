use std::fmt;

use crate::error::ModelError;

/// Natural key of a grant, as it appears in the source table.
///
/// Construction only rejects empty values; the stricter `GR-<year>-<seq>`
/// shape is demanded lazily by [`GrantId::key_stem`], since only rows that
/// feed synthesized child keys need it.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct GrantId(String);

impl GrantId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyGrantId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The portion of the id used inside synthesized child keys.
    ///
    /// Strips the constant `GR-` prefix and keeps at most 12 characters of
    /// the `<year>-<seq>` remainder. Because the shape is enforced and the
    /// stripped prefix is constant, two distinct well-formed ids can never
    /// share a stem.
    pub fn key_stem(&self) -> Result<&str, ModelError> {
        let rest = self
            .0
            .strip_prefix("GR-")
            .ok_or_else(|| ModelError::MalformedGrantId(self.0.clone()))?;
        let (year, seq) = rest
            .split_once('-')
            .ok_or_else(|| ModelError::MalformedGrantId(self.0.clone()))?;
        let year_ok = year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit());
        let seq_ok = !seq.is_empty() && seq.bytes().all(|b| b.is_ascii_digit());
        if !year_ok || !seq_ok {
            return Err(ModelError::MalformedGrantId(self.0.clone()));
        }
        Ok(&rest[..rest.len().min(12)])
    }
}

impl fmt::Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which child table a synthesized key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyPrefix {
    Report,
    Visit,
}

impl KeyPrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyPrefix::Report => "RPT",
            KeyPrefix::Visit => "VST",
        }
    }
}

/// A synthesized child-entity key, kept structured until serialization.
///
/// Rendered as `PREFIX-<stem>-<ordinal>` with the ordinal zero-padded to
/// four digits, e.g. `RPT-2023-0001-0002`. Ordinals are assigned per grant
/// starting at 1, so keys are unique within one run's output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    pub prefix: KeyPrefix,
    pub stem: String,
    pub ordinal: u32,
}

impl EntityKey {
    pub fn new(prefix: KeyPrefix, grant_id: &GrantId, ordinal: u32) -> Result<Self, ModelError> {
        Ok(Self {
            prefix,
            stem: grant_id.key_stem()?.to_string(),
            ordinal,
        })
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{:04}", self.prefix.as_str(), self.stem, self.ordinal)
    }
}

impl serde::Serialize for EntityKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
