//! Card catalog loader.

use std::path::Path;

use combat_core::CardDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_file, ron_options};

/// Card catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardCatalog {
    pub cards: Vec<CardDefinition>,
}

/// Loader for the card catalog from RON files.
pub struct CardLoader;

impl CardLoader {
    /// Load card catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a CardCatalog
    pub fn load(path: &Path) -> LoadResult<Vec<CardDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<CardDefinition>> {
        let catalog: CardCatalog = ron_options()
            .from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse card catalog RON: {}", e))?;

        ensure_unique("card", catalog.cards.iter().map(|c| c.id.as_str()))?;
        for card in &catalog.cards {
            if card.cost < 0 {
                anyhow::bail!("Card '{}' has a negative cost", card.id);
            }
        }
        Ok(catalog.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{CardKeywords, CardType, StatusId};

    #[test]
    fn parses_cards_with_implicit_some() {
        let ron = r#"(
            cards: [
                (
                    id: "rend",
                    name: "Rend",
                    cost: 1,
                    card_type: attack,
                    keywords: "EXHAUST | RETURN",
                    effect: (
                        target: enemy,
                        damage: (multiplier: 0.8, hits: 2),
                        apply_status: [(status: bleed, value: 2)],
                    ),
                ),
                (
                    id: "brace",
                    name: "Brace",
                    cost: 1,
                    card_type: skill,
                    effect: (block: (multiplier: 1.5)),
                ),
            ],
        )"#;

        let cards = CardLoader::parse(ron).unwrap();
        assert_eq!(cards.len(), 2);
        let rend = &cards[0];
        assert_eq!(rend.card_type, CardType::Attack);
        assert!(rend.has(CardKeywords::EXHAUST | CardKeywords::RETURN));
        let damage = rend.effect.damage.as_ref().unwrap();
        assert_eq!(damage.hits, 2);
        assert_eq!(damage.pierce_multiplier, 0.0);
        assert_eq!(rend.effect.apply_status[0].status, StatusId::Bleed);
        assert_eq!(rend.effect.apply_status[0].duration, 1);
        assert!(cards[1].effect.damage.is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let ron = r#"(cards: [
            (id: "a", name: "A", card_type: skill),
            (id: "a", name: "A again", card_type: power),
        ])"#;
        let err = CardLoader::parse(ron).unwrap_err();
        assert!(err.to_string().contains("Duplicate card id 'a'"));
    }
}
