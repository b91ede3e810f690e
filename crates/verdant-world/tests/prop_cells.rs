use proptest::prelude::*;
use verdant_world::{CellIndex, IndexError, cell_span, plant_test};

proptest! {
    #[test]
    fn span_covers_half_open_range(min in -5000i32..5000, len in 0i32..2000) {
        let max = min + len;
        let cells: Vec<i32> = cell_span(min, max, 30).collect();
        for c in &cells {
            prop_assert_eq!(c.rem_euclid(30), 0);
            prop_assert!(*c < max);
            prop_assert!(*c > min - 30);
        }
        for w in cells.windows(2) {
            prop_assert_eq!(w[1] - w[0], 30);
        }
        if let Some(first) = cells.first() {
            prop_assert!(*first <= min);
        }
    }

    #[test]
    fn plant_test_is_pure(x in -100_000i32..100_000, seed in any::<i64>()) {
        prop_assert_eq!(plant_test(x, seed, 100, 5), plant_test(x, seed, 100, 5));
    }

    #[test]
    fn put_then_remove_restores_empty(cells in prop::collection::hash_set(-500i32..500, 0..40)) {
        let mut idx = CellIndex::new();
        for c in &cells {
            idx.put(*c, vec![*c]).unwrap();
        }
        prop_assert_eq!(idx.len(), cells.len());
        for c in &cells {
            prop_assert_eq!(idx.remove(*c), Ok(vec![*c]));
            prop_assert_eq!(idx.remove(*c), Err(IndexError::NotFound(*c)));
        }
        prop_assert!(idx.is_empty());
    }
}

#[test]
fn plant_chance_bounds() {
    assert!((0..200).all(|x| !plant_test(x * 30, 3343, 100, 0)));
    assert!((0..200).all(|x| plant_test(x * 30, 3343, 100, 100)));
}
