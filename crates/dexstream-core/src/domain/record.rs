//! The normalized record pushed to stream clients.

use serde::Serialize;

/// The six base attribute scores of a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub sp_attack: u32,
    pub sp_defense: u32,
}

impl BaseStats {
    /// Sum of all six scores, saturating on absurd upstream values.
    pub const fn total(&self) -> u32 {
        self.hp
            .saturating_add(self.attack)
            .saturating_add(self.defense)
            .saturating_add(self.speed)
            .saturating_add(self.sp_attack)
            .saturating_add(self.sp_defense)
    }
}

/// Flat, normalized catalog entry.
///
/// Built only by [`normalize`](crate::domain::normalize) and immutable
/// afterwards. `total_stats` is derived from `stats` at construction, so the
/// two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DexRecord {
    id: u32,
    name: String,
    types: Vec<String>,
    height: f64,
    weight: f64,
    #[serde(flatten)]
    stats: BaseStats,
    image_url: String,
    sprite_url: String,
    total_stats: u32,
}

impl DexRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: u32,
        name: String,
        types: Vec<String>,
        height: f64,
        weight: f64,
        stats: BaseStats,
        image_url: String,
        sprite_url: String,
    ) -> Self {
        Self {
            id,
            name,
            types,
            height,
            weight,
            stats,
            image_url,
            sprite_url,
            total_stats: stats.total(),
        }
    }

    pub const fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Height in metres.
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Weight in kilograms.
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    pub const fn stats(&self) -> &BaseStats {
        &self.stats
    }

    /// Preferred image: official artwork, falling back to the sprite.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn sprite_url(&self) -> &str {
        &self.sprite_url
    }

    pub const fn total_stats(&self) -> u32 {
        self.total_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_flat_wire_shape() {
        let stats = BaseStats {
            hp: 35,
            attack: 55,
            defense: 40,
            speed: 90,
            sp_attack: 50,
            sp_defense: 50,
        };
        let record = DexRecord::new(
            25,
            "Pikachu".to_string(),
            vec!["Electric".to_string()],
            0.4,
            6.0,
            stats,
            "https://img/art/25.png".to_string(),
            "https://img/25.png".to_string(),
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 25,
                "name": "Pikachu",
                "types": ["Electric"],
                "height": 0.4,
                "weight": 6.0,
                "hp": 35,
                "attack": 55,
                "defense": 40,
                "speed": 90,
                "sp_attack": 50,
                "sp_defense": 50,
                "image_url": "https://img/art/25.png",
                "sprite_url": "https://img/25.png",
                "total_stats": 320
            })
        );
    }

    #[test]
    fn test_total_of_default_stats_is_zero() {
        assert_eq!(BaseStats::default().total(), 0);
    }
}
