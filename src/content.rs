//! Content provider: the static pools (players, customers, orders, quizzes,
//! ingredient catalog) the game session controller draws from each round.

use indexmap::IndexMap;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while validating or drawing from a content pack.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The pack failed structural validation and cannot be used.
    #[error("invalid content pack: {0}")]
    Invalid(String),
    /// A required pool has no entry for the selected content ranges.
    #[error("no {pool} available for the selected content ranges")]
    Exhausted {
        /// Name of the exhausted pool.
        pool: &'static str,
    },
}

/// Entry of the fixed player pool partitioned into the two teams.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerEntry {
    /// Stable identifier of the player.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Avatar reference rendered by the presentation layer.
    pub avatar_url: String,
}

/// Flavor entity displayed as the customer placing the order.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Display name.
    pub name: String,
    /// Neutral visual reference.
    pub emoji: String,
    /// Visual shown after a correct quiz answer.
    pub happy_emoji: String,
    /// Visual shown after an incorrect quiz answer.
    pub angry_emoji: String,
}

/// Display metadata for one ingredient of the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientInfo {
    /// Display name.
    pub name: String,
    /// Visual reference.
    pub emoji: String,
}

/// A recipe target: the ordered ingredient sequence a team must match.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderTemplate {
    /// Ordered ingredient identifiers, bottom to top.
    pub ingredients: Vec<String>,
    /// Content range this order belongs to, matched against the settings filter.
    #[serde(default = "default_range")]
    pub range: u8,
}

/// One quiz of the bank, presented to the round's winning team.
#[derive(Debug, Clone, Deserialize)]
pub struct Quiz {
    /// Question text.
    pub question: String,
    /// Answer options offered to the team (at least two).
    pub options: Vec<String>,
    /// The correct answer, always one of `options`.
    pub answer: String,
    /// Content range this quiz belongs to, matched against the settings filter.
    #[serde(default = "default_range")]
    pub range: u8,
}

fn default_range() -> u8 {
    1
}

/// Raw content pools as loaded from the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentPack {
    /// Player pool split into the two teams at game start.
    pub players: Vec<PlayerEntry>,
    /// Customer pool, one drawn per round.
    pub customers: Vec<Customer>,
    /// Ingredient catalog keyed by identifier, in display order.
    pub ingredients: IndexMap<String, IngredientInfo>,
    /// Order templates, one drawn per round.
    pub orders: Vec<OrderTemplate>,
    /// Quiz bank, one drawn per won round.
    pub quizzes: Vec<Quiz>,
}

/// Validated content pools the controller draws from.
#[derive(Debug, Clone)]
pub struct ContentProvider {
    pack: ContentPack,
}

impl ContentProvider {
    /// Validate a pack and wrap it for runtime use.
    ///
    /// Guarantees enforced here so gameplay never has to re-check them: the
    /// player pool can seat two teams, no pool is empty, every order is a
    /// non-empty sequence of cataloged ingredients, and every quiz carries
    /// its correct answer among at least two options.
    pub fn new(pack: ContentPack) -> Result<Self, ContentError> {
        if pack.players.len() < 2 {
            return Err(ContentError::Invalid(
                "player pool must contain at least two players".into(),
            ));
        }
        if pack.customers.is_empty() {
            return Err(ContentError::Invalid("customer pool is empty".into()));
        }
        if pack.ingredients.is_empty() {
            return Err(ContentError::Invalid("ingredient catalog is empty".into()));
        }
        if pack.orders.is_empty() {
            return Err(ContentError::Invalid("order template pool is empty".into()));
        }
        if pack.quizzes.is_empty() {
            return Err(ContentError::Invalid("quiz bank is empty".into()));
        }

        for (index, order) in pack.orders.iter().enumerate() {
            if order.ingredients.is_empty() {
                return Err(ContentError::Invalid(format!(
                    "order template {index} has no ingredients"
                )));
            }
            for ingredient in &order.ingredients {
                if !pack.ingredients.contains_key(ingredient) {
                    return Err(ContentError::Invalid(format!(
                        "order template {index} references unknown ingredient `{ingredient}`"
                    )));
                }
            }
        }

        for (index, quiz) in pack.quizzes.iter().enumerate() {
            if quiz.options.len() < 2 {
                return Err(ContentError::Invalid(format!(
                    "quiz {index} needs at least two answer options"
                )));
            }
            if !quiz.options.contains(&quiz.answer) {
                return Err(ContentError::Invalid(format!(
                    "quiz {index} does not list its correct answer among the options"
                )));
            }
        }

        Ok(Self { pack })
    }

    /// The fixed player pool, in roster order.
    pub fn players(&self) -> &[PlayerEntry] {
        &self.pack.players
    }

    /// The ingredient catalog in display order.
    pub fn ingredients(&self) -> &IndexMap<String, IngredientInfo> {
        &self.pack.ingredients
    }

    /// Number of order templates in the pack.
    pub fn order_count(&self) -> usize {
        self.pack.orders.len()
    }

    /// Number of quizzes in the pack.
    pub fn quiz_count(&self) -> usize {
        self.pack.quizzes.len()
    }

    /// Draw a customer for the round. Customers are not range-filtered.
    pub fn draw_customer(&self) -> Customer {
        let mut rng = rand::rng();
        self.pack
            .customers
            .choose(&mut rng)
            .cloned()
            .expect("customer pool validated non-empty")
    }

    /// Draw an order template matching any of the selected content ranges.
    pub fn draw_order(&self, ranges: &[u8]) -> Result<Vec<String>, ContentError> {
        let candidates: Vec<&OrderTemplate> = self
            .pack
            .orders
            .iter()
            .filter(|order| ranges.contains(&order.range))
            .collect();

        let mut rng = rand::rng();
        candidates
            .choose(&mut rng)
            .map(|order| order.ingredients.clone())
            .ok_or(ContentError::Exhausted { pool: "orders" })
    }

    /// Draw a quiz matching any of the selected content ranges.
    pub fn draw_quiz(&self, ranges: &[u8]) -> Result<Quiz, ContentError> {
        let candidates: Vec<&Quiz> = self
            .pack
            .quizzes
            .iter()
            .filter(|quiz| ranges.contains(&quiz.range))
            .collect();

        let mut rng = rand::rng();
        candidates
            .choose(&mut rng)
            .map(|quiz| (*quiz).clone())
            .ok_or(ContentError::Exhausted { pool: "quizzes" })
    }

    /// Check that the selected ranges can supply every pool a round needs.
    ///
    /// Called before a session starts so a round never begins without a
    /// usable order and quiz.
    pub fn ensure_playable(&self, ranges: &[u8]) -> Result<(), ContentError> {
        if !self
            .pack
            .orders
            .iter()
            .any(|order| ranges.contains(&order.range))
        {
            return Err(ContentError::Exhausted { pool: "orders" });
        }
        if !self
            .pack
            .quizzes
            .iter()
            .any(|quiz| ranges.contains(&quiz.range))
        {
            return Err(ContentError::Exhausted { pool: "quizzes" });
        }
        Ok(())
    }
}

/// Built-in content pack used when no configuration file is present.
pub fn builtin_pack() -> ContentPack {
    let ingredients = [
        ("bun-bottom", "Bottom Bun", "🍞"),
        ("patty", "Patty", "🥩"),
        ("cheese", "Cheese", "🧀"),
        ("lettuce", "Lettuce", "🥬"),
        ("tomato", "Tomato", "🍅"),
        ("onion", "Onion", "🧅"),
        ("bun-top", "Top Bun", "🍞"),
    ]
    .into_iter()
    .map(|(id, name, emoji)| {
        (
            id.to_string(),
            IngredientInfo {
                name: name.to_string(),
                emoji: emoji.to_string(),
            },
        )
    })
    .collect();

    let orders = [
        (vec!["bun-bottom", "patty", "cheese", "bun-top"], 1),
        (
            vec!["bun-bottom", "lettuce", "patty", "tomato", "bun-top"],
            2,
        ),
        (
            vec!["bun-bottom", "patty", "onion", "lettuce", "bun-top"],
            3,
        ),
        (
            vec!["bun-bottom", "patty", "cheese", "tomato", "lettuce", "bun-top"],
            4,
        ),
        (vec!["bun-bottom", "patty", "onion", "bun-top"], 5),
        (
            vec!["bun-bottom", "patty", "cheese", "onion", "tomato", "bun-top"],
            6,
        ),
        (vec!["bun-bottom", "lettuce", "tomato", "onion", "bun-top"], 7),
        (vec!["bun-bottom", "patty", "patty", "cheese", "bun-top"], 8),
    ]
    .into_iter()
    .map(|(ingredients, range)| OrderTemplate {
        ingredients: ingredients.into_iter().map(str::to_string).collect(),
        range,
    })
    .collect();

    let quizzes = [
        (
            "What animal says 'meow'?",
            vec!["Dog", "Cat", "Pig", "Cow"],
            "Cat",
            1,
        ),
        (
            "Which color is a banana?",
            vec!["Red", "Blue", "Yellow", "Green"],
            "Yellow",
            2,
        ),
        (
            "What do you use to write?",
            vec!["Spoon", "Pencil", "Shoe", "Hat"],
            "Pencil",
            3,
        ),
        (
            "How many eyes do you have?",
            vec!["One", "Two", "Three", "Four"],
            "Two",
            4,
        ),
        (
            "What is the opposite of 'hot'?",
            vec!["Warm", "Cold", "Big", "Small"],
            "Cold",
            5,
        ),
        (
            "What color is the sky on a sunny day?",
            vec!["Blue", "Purple", "Black", "Orange"],
            "Blue",
            6,
        ),
        (
            "How many legs does a dog have?",
            vec!["Two", "Three", "Four", "Six"],
            "Four",
            7,
        ),
        (
            "Which fruit is red?",
            vec!["Banana", "Apple", "Grape", "Lemon"],
            "Apple",
            8,
        ),
    ]
    .into_iter()
    .map(|(question, options, answer, range)| Quiz {
        question: question.to_string(),
        options: options.into_iter().map(str::to_string).collect(),
        answer: answer.to_string(),
        range,
    })
    .collect();

    let players = [
        ("p1", "Emily"),
        ("p2", "John"),
        ("p3", "Olivia"),
        ("p4", "Mike"),
        ("p5", "James"),
        ("p6", "Lily"),
        ("p7", "Jacob"),
        ("p8", "Bella"),
        ("p9", "David"),
        ("p10", "Tom"),
        ("p11", "Alice"),
        ("p12", "Chloe"),
    ]
    .into_iter()
    .map(|(id, name)| PlayerEntry {
        id: id.to_string(),
        name: name.to_string(),
        avatar_url: format!("https://api.dicebear.com/9.x/open-peeps/svg?seed={name}"),
    })
    .collect();

    let customers = [
        ("Cat", "🐱"),
        ("Dog", "🐶"),
        ("Rabbit", "🐰"),
        ("Frog", "🐸"),
        ("Bear", "🐻"),
    ]
    .into_iter()
    .map(|(name, emoji)| Customer {
        name: name.to_string(),
        emoji: emoji.to_string(),
        happy_emoji: "😊".to_string(),
        angry_emoji: "😠".to_string(),
    })
    .collect();

    ContentPack {
        players,
        customers,
        ingredients,
        orders,
        quizzes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_pack_passes_validation() {
        let provider = ContentProvider::new(builtin_pack()).unwrap();
        assert!(provider.players().len() >= 2);
        assert!(!provider.ingredients().is_empty());
    }

    #[test]
    fn quiz_without_its_answer_is_rejected() {
        let mut pack = builtin_pack();
        pack.quizzes[0].answer = "Elephant".into();
        let err = ContentProvider::new(pack).unwrap_err();
        assert!(matches!(err, ContentError::Invalid(_)));
    }

    #[test]
    fn order_with_unknown_ingredient_is_rejected() {
        let mut pack = builtin_pack();
        pack.orders[0].ingredients.push("pineapple".into());
        let err = ContentProvider::new(pack).unwrap_err();
        assert!(matches!(err, ContentError::Invalid(_)));
    }

    #[test]
    fn empty_order_pool_is_rejected() {
        let mut pack = builtin_pack();
        pack.orders.clear();
        assert!(ContentProvider::new(pack).is_err());
    }

    #[test]
    fn draws_respect_the_range_filter() {
        let provider = ContentProvider::new(builtin_pack()).unwrap();
        for _ in 0..16 {
            let order = provider.draw_order(&[1]).unwrap();
            assert_eq!(order, vec!["bun-bottom", "patty", "cheese", "bun-top"]);
            let quiz = provider.draw_quiz(&[5]).unwrap();
            assert_eq!(quiz.answer, "Cold");
        }
    }

    #[test]
    fn unmatched_ranges_exhaust_the_pools() {
        let provider = ContentProvider::new(builtin_pack()).unwrap();
        assert!(matches!(
            provider.draw_order(&[42]),
            Err(ContentError::Exhausted { pool: "orders" })
        ));
        assert!(provider.ensure_playable(&[42]).is_err());
        assert!(provider.ensure_playable(&[1, 42]).is_ok());
    }
}
