//! Sample Pool
//!
//! Items used by "Add 10 random items".

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::NewGroceryItem;

/// Number of items created by one bulk add
pub const BULK_ADD_COUNT: usize = 10;

/// (name, amount)
pub const SAMPLE_ITEMS: &[(&str, f64)] = &[
    ("Milk", 2.0),
    ("Eggs", 12.0),
    ("Bread", 1.0),
    ("Butter", 1.0),
    ("Cheese", 1.0),
    ("Apples", 6.0),
    ("Bananas", 5.0),
    ("Tomatoes", 4.0),
    ("Potatoes", 10.0),
    ("Onions", 3.0),
    ("Rice", 1.0),
    ("Pasta", 2.0),
    ("Chicken breast", 2.0),
    ("Yogurt", 4.0),
    ("Coffee", 1.0),
    ("Orange juice", 2.0),
    ("Carrots", 8.0),
    ("Olive oil", 1.0),
    ("Spinach", 1.0),
    ("Cereal", 1.0),
];

/// `count` items drawn with replacement from [`SAMPLE_ITEMS`]
pub fn random_batch<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<NewGroceryItem> {
    (0..count)
        .filter_map(|_| SAMPLE_ITEMS.choose(&mut *rng))
        .map(|(name, amount)| NewGroceryItem::new(*name, *amount))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pool_items_are_valid() {
        for (name, amount) in SAMPLE_ITEMS {
            assert!(name.trim().chars().count() >= 2, "{}", name);
            assert!(*amount > 0.0, "{}", name);
        }
    }

    #[test]
    fn test_random_batch_draws_from_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let batch = random_batch(&mut rng, BULK_ADD_COUNT);

        assert_eq!(batch.len(), BULK_ADD_COUNT);
        for item in &batch {
            assert!(SAMPLE_ITEMS.iter().any(|(name, amount)| *name == item.name && *amount == item.amount));
        }
    }

    #[test]
    fn test_sampling_with_replacement() {
        // More draws than the pool holds must still succeed
        let mut rng = StdRng::seed_from_u64(1);
        let batch = random_batch(&mut rng, SAMPLE_ITEMS.len() * 3);
        assert_eq!(batch.len(), SAMPLE_ITEMS.len() * 3);
    }
}
