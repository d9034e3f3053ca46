//! Fixtures for downstream test suites (feature `test-utils`).

use crate::contracts::pokeapi::{
    Artwork, NamedResource, OtherSprites, PokemonPayload, Sprites, StatSlot, TypeSlot,
};
use crate::domain::{DexRecord, normalize};

/// A complete, valid payload with fixed stats (total 300).
pub fn sample_payload(id: u32, name: &str) -> PokemonPayload {
    let stat = |label: &str, base_stat: u32| StatSlot {
        base_stat,
        stat: NamedResource {
            name: label.to_string(),
        },
    };

    PokemonPayload {
        id,
        name: name.to_string(),
        height: 7,
        weight: 342,
        types: vec![TypeSlot {
            kind: NamedResource {
                name: "normal".to_string(),
            },
        }],
        stats: vec![
            stat("hp", 50),
            stat("attack", 50),
            stat("defense", 50),
            stat("special-attack", 50),
            stat("special-defense", 50),
            stat("speed", 50),
        ],
        sprites: Sprites {
            front_default: Some(format!("https://img.test/{id}.png")),
            other: Some(OtherSprites {
                official_artwork: Some(Artwork {
                    front_default: Some(format!("https://img.test/art/{id}.png")),
                }),
            }),
        },
    }
}

/// `normalize(sample_payload(id, name))`.
pub fn sample_record(id: u32, name: &str) -> DexRecord {
    normalize(sample_payload(id, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_record_is_valid_and_consistent() {
        assert!(sample_payload(25, "pikachu").validate().is_ok());

        let record = sample_record(25, "mr-mime");
        assert_eq!(record.name(), "Mr Mime");
        assert_eq!(record.total_stats(), 300);
        assert_eq!(record.image_url(), "https://img.test/art/25.png");
    }
}
