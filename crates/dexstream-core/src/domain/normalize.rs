//! Raw payload to `DexRecord` normalization.
//!
//! Pure functions only. The payload has already been decoded and validated
//! by the catalog adapter, so nothing here can fail.

use crate::contracts::pokeapi::PokemonPayload;
use crate::domain::record::{BaseStats, DexRecord};

/// Separator used inside upstream slugs (`ho-oh`, `special-attack`).
const SLUG_SEPARATOR: char = '-';

/// Upstream measurements are integer tenths of the display unit.
const MEASUREMENT_SCALE: f64 = 10.0;

/// Turn an upstream slug into a display name.
///
/// Separators become spaces and every whitespace-delimited token gets an
/// uppercase first character and a lowercase remainder. Runs of whitespace
/// collapse to one space. The result is a fixed point: applying it twice
/// gives the same string.
pub fn title_case(raw: &str) -> String {
    raw.replace(SLUG_SEPARATOR, " ")
        .split_whitespace()
        .map(capitalize_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_token(token: &str) -> String {
    let mut chars = token.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

/// Build the normalized record from a decoded payload.
pub fn normalize(raw: PokemonPayload) -> DexRecord {
    let stats = extract_stats(&raw);
    let sprite_url = raw.sprite_url().unwrap_or_default().to_string();
    let image_url = raw
        .artwork_url()
        .map_or_else(|| sprite_url.clone(), str::to_string);

    let types = raw
        .types
        .iter()
        .map(|slot| title_case(&slot.kind.name))
        .collect();

    DexRecord::new(
        raw.id,
        title_case(&raw.name),
        types,
        scale(raw.height),
        scale(raw.weight),
        stats,
        image_url,
        sprite_url,
    )
}

fn scale(raw: u32) -> f64 {
    f64::from(raw) / MEASUREMENT_SCALE
}

/// Map the recognized stat labels onto named fields.
///
/// Unknown labels are ignored and missing ones stay at zero. If a label
/// repeats, the last occurrence wins.
fn extract_stats(raw: &PokemonPayload) -> BaseStats {
    let mut stats = BaseStats::default();
    for slot in &raw.stats {
        let value = slot.base_stat;
        match slot.stat.name.as_str() {
            "hp" => stats.hp = value,
            "attack" => stats.attack = value,
            "defense" => stats.defense = value,
            "speed" => stats.speed = value,
            "special-attack" => stats.sp_attack = value,
            "special-defense" => stats.sp_defense = value,
            _ => {}
        }
    }
    stats
}
