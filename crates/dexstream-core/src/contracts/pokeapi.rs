//! Raw catalog payload schema.
//!
//! Mirrors the subset of the PokeAPI `/pokemon/{id}` response that the
//! normalizer reads. Required fields carry no serde defaults: a missing or
//! mistyped field fails decoding instead of silently becoming zero. Unknown
//! fields are ignored since the upstream document is much larger than this
//! schema.

use serde::Deserialize;
use thiserror::Error;

/// A decoded `/pokemon/{id}` document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PokemonPayload {
    pub id: u32,
    pub name: String,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    pub types: Vec<TypeSlot>,
    pub stats: Vec<StatSlot>,
    pub sprites: Sprites,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}

/// `{ "name": ... }` reference to another catalog resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

/// Image references. Every URL is nullable upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Artwork {
    pub front_default: Option<String>,
}

/// Semantic problems in a payload that decoded successfully.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload id must be positive")]
    ZeroId,

    #[error("payload name is empty")]
    EmptyName,
}

impl PokemonPayload {
    /// Reject payloads that decode but cannot produce a valid record.
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.id == 0 {
            return Err(PayloadError::ZeroId);
        }
        if self.name.trim().is_empty() {
            return Err(PayloadError::EmptyName);
        }
        Ok(())
    }

    /// High-resolution artwork URL, if present and non-empty.
    pub fn artwork_url(&self) -> Option<&str> {
        self.sprites
            .other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|art| art.front_default.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Default sprite URL, if present and non-empty.
    pub fn sprite_url(&self) -> Option<&str> {
        self.sprites
            .front_default
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}
