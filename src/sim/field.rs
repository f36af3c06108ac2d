//! Row-banded obstacle and collectible fields
//!
//! Both fields are a fixed ring of rows spaced `ROW_GAP` cells apart. Each
//! forward step shifts every row down one cell; a row that falls more than
//! `ROW_GAP` cells below the screen is regenerated just above the furthest
//! (highest) row and becomes the new furthest row.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::CellRect;
use crate::consts::{COLLECTIBLES_PER_ROW, OBSTACLES_PER_ROW, ROW_GAP};

/// An entity that lives inside a row band
pub trait RowItem: Sized {
    /// Number of items in one row
    const PER_ROW: usize;

    /// Generate a full row of items at row `y`, left to right
    fn generate_row(rng: &mut Pcg32, y: i32) -> Vec<Self>;

    fn rect(&self) -> &CellRect;

    /// Move the item onto row `y`; only its row may change this
    fn set_y(&mut self, y: i32);

    #[cfg(test)]
    fn set_rect(&mut self, rect: CellRect);
}

/// A blocking rectangle, 1-2 cells wide and tall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: CellRect,
}

impl RowItem for Obstacle {
    const PER_ROW: usize = OBSTACLES_PER_ROW;

    fn generate_row(rng: &mut Pcg32, y: i32) -> Vec<Self> {
        let mut row: Vec<Obstacle> = Vec::with_capacity(Self::PER_ROW);
        for _ in 0..Self::PER_ROW {
            let gap = rng.random_range(0..4);
            let x = match row.last() {
                Some(prev) => prev.rect.right() + gap,
                None => gap,
            };
            let w = rng.random_range(1..=2);
            let h = rng.random_range(1..=2);
            row.push(Obstacle {
                rect: CellRect::new(x, y, w, h),
            });
        }
        row
    }

    fn rect(&self) -> &CellRect {
        &self.rect
    }

    fn set_y(&mut self, y: i32) {
        self.rect.y = y;
    }

    #[cfg(test)]
    fn set_rect(&mut self, rect: CellRect) {
        self.rect = rect;
    }
}

/// A single-cell pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectible {
    pub rect: CellRect,
    pub taken: bool,
}

impl RowItem for Collectible {
    const PER_ROW: usize = COLLECTIBLES_PER_ROW;

    fn generate_row(rng: &mut Pcg32, y: i32) -> Vec<Self> {
        let mut row: Vec<Collectible> = Vec::with_capacity(Self::PER_ROW);
        for _ in 0..Self::PER_ROW {
            // Never hugs the border, never shares a cell with its neighbour
            let gap = rng.random_range(1..=4);
            let x = match row.last() {
                Some(prev) => prev.rect.x + gap,
                None => gap,
            };
            row.push(Collectible {
                rect: CellRect::new(x, y, 1, 1),
                taken: false,
            });
        }
        row
    }

    fn rect(&self) -> &CellRect {
        &self.rect
    }

    fn set_y(&mut self, y: i32) {
        self.rect.y = y;
    }

    #[cfg(test)]
    fn set_rect(&mut self, rect: CellRect) {
        self.rect = rect;
    }
}

/// One horizontal band of items sharing a row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row<T> {
    /// Fixed slot of this row in its field
    pub index: usize,
    pub y: i32,
    pub items: Vec<T>,
}

impl<T: RowItem> Row<T> {
    fn generate(rng: &mut Pcg32, index: usize, y: i32) -> Self {
        Self {
            index,
            y,
            items: T::generate_row(rng, y),
        }
    }

    fn shift_down(&mut self) {
        self.y -= 1;
        for item in &mut self.items {
            item.set_y(self.y);
        }
    }
}

/// Ring of row bands that scrolls and recycles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowField<T> {
    rows: Vec<Row<T>>,
    /// Index of the highest row (recycle insertion point)
    furthest: usize,
}

pub type ObstacleField = RowField<Obstacle>;
pub type CollectibleField = RowField<Collectible>;

impl<T: RowItem> RowField<T> {
    /// Lay out `row_count` rows starting at `base_row`, each `ROW_GAP` above the last
    pub fn generate(rng: &mut Pcg32, row_count: usize, base_row: i32) -> Self {
        let rows = (0..row_count)
            .map(|i| Row::generate(rng, i, base_row + i as i32 * ROW_GAP))
            .collect();
        Self {
            rows,
            furthest: row_count.saturating_sub(1),
        }
    }

    /// Shift every row down one cell and recycle rows that left the screen.
    /// Returns the number of rows recycled.
    pub fn scroll(&mut self, rng: &mut Pcg32) -> usize {
        for row in &mut self.rows {
            row.shift_down();
        }

        let mut recycled = 0;
        for i in 0..self.rows.len() {
            if self.rows[i].y < -ROW_GAP {
                let y = self.rows[self.furthest].y + ROW_GAP;
                self.rows[i] = Row::generate(rng, i, y);
                self.furthest = i;
                recycled += 1;
            }
        }
        if recycled > 0 {
            log::debug!("Recycled {} row(s), furthest now {}", recycled, self.furthest);
        }
        recycled
    }

    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    pub fn furthest_row(&self) -> &Row<T> {
        &self.rows[self.furthest]
    }

    /// All items, row by row
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().flat_map(|r| r.items.iter())
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.iter_mut().flat_map(|r| r.items.iter_mut())
    }

    pub fn rects(&self) -> impl Iterator<Item = &CellRect> {
        self.iter().map(|item| item.rect())
    }

    /// Put row `index` at `rect.y` with its first item covering `rect`.
    /// The other items of the row are parked past the right edge.
    #[cfg(test)]
    pub(crate) fn plant(&mut self, index: usize, rect: CellRect) {
        let row = &mut self.rows[index];
        row.y = rect.y;
        for (slot, item) in row.items.iter_mut().enumerate() {
            if slot == 0 {
                item.set_rect(rect);
            } else {
                let parked = crate::consts::GRID_COLS + 3 * slot as i32;
                item.set_rect(CellRect::new(parked, rect.y, 1, 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len() * T::PER_ROW
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ObstacleField {
    /// Returns true if `rect` collides with any obstacle
    pub fn blocks(&self, rect: &CellRect) -> bool {
        super::grid::overlaps_any(rect, self.rects())
    }
}

impl CollectibleField {
    /// Mark every untaken collectible under `rect` as taken.
    /// Returns how many were picked up.
    pub fn collect(&mut self, rect: &CellRect) -> u32 {
        let mut count = 0;
        for item in self.iter_mut() {
            if !item.taken && item.rect.overlaps(rect) {
                item.taken = true;
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    fn assert_rows_disjoint<T: RowItem>(field: &RowField<T>) {
        for row in field.rows() {
            for pair in row.items.windows(2) {
                assert!(pair[0].rect().right() <= pair[1].rect().x);
            }
        }
    }

    #[test]
    fn test_generate_layout() {
        let mut rng = rng(1);
        let field = ObstacleField::generate(&mut rng, 6, 13);
        assert_eq!(field.len(), 24);
        let ys: Vec<i32> = field.rows().iter().map(|r| r.y).collect();
        assert_eq!(ys, vec![13, 16, 19, 22, 25, 28]);
        assert_eq!(field.furthest_row().index, 5);
        for o in field.iter() {
            assert!((1..=2).contains(&o.rect.w));
            assert!((1..=2).contains(&o.rect.h));
            assert!(o.rect.x >= 0);
        }
    }

    #[test]
    fn test_first_collectible_never_touches_border() {
        let mut rng = rng(7);
        let field = CollectibleField::generate(&mut rng, 6, 13);
        assert_eq!(field.len(), 18);
        for row in field.rows() {
            assert!(row.items[0].rect.x >= 1);
            assert!(row.items.iter().all(|c| !c.taken && c.rect.w == 1 && c.rect.h == 1));
        }
    }

    #[test]
    fn test_scroll_recycles_above_furthest() {
        let mut rng = rng(3);
        let mut field = ObstacleField::generate(&mut rng, 6, 13);
        // Row 0 starts at 13 and is recycled once it drops below -3
        for _ in 0..16 {
            assert_eq!(field.scroll(&mut rng), 0);
        }
        assert_eq!(field.rows()[0].y, -3);
        assert_eq!(field.scroll(&mut rng), 1);
        // Row 5 is now at 28 - 17 = 11, row 0 lands 3 above it
        assert_eq!(field.rows()[0].y, 14);
        assert_eq!(field.furthest_row().index, 0);
        assert!(field.rows()[0].items.iter().all(|o| o.rect.y == 14));
    }

    #[test]
    fn test_taken_resets_only_on_recycle() {
        let mut rng = rng(11);
        let mut field = CollectibleField::generate(&mut rng, 6, 13);
        let target = field.rows()[0].items[0].rect;
        assert_eq!(field.collect(&target), 1);
        // Taking twice gives nothing
        assert_eq!(field.collect(&target), 0);

        for _ in 0..16 {
            field.scroll(&mut rng);
            assert!(field.rows()[0].items[0].taken);
        }
        field.scroll(&mut rng);
        assert!(!field.rows()[0].items[0].taken);
    }

    #[test]
    fn test_planted_item_follows_its_row() {
        let mut rng = rng(5);
        let mut field = CollectibleField::generate(&mut rng, 6, 13);
        field.plant(0, CellRect::new(3, 6, 1, 1));
        assert_eq!(field.rows()[0].y, 6);

        field.scroll(&mut rng);
        let row = &field.rows()[0];
        assert_eq!(row.y, 5);
        assert!(row.items.iter().all(|c| c.rect.y == row.y));
        assert_eq!(row.items[0].rect, CellRect::new(3, 5, 1, 1));
        // Parked items stay off screen
        assert!(row.items[1..].iter().all(|c| c.rect.x >= crate::consts::GRID_COLS));
    }

    proptest! {
        #[test]
        fn prop_rows_never_overlap(seed in any::<u64>(), steps in 0usize..120) {
            let mut rng = rng(seed);
            let mut obstacles = ObstacleField::generate(&mut rng, 6, 13);
            let mut collectibles = CollectibleField::generate(&mut rng, 6, 13);
            for _ in 0..steps {
                obstacles.scroll(&mut rng);
                collectibles.scroll(&mut rng);
            }
            assert_rows_disjoint(&obstacles);
            assert_rows_disjoint(&collectibles);
        }

        #[test]
        fn prop_row_mapping_is_stable(seed in any::<u64>(), steps in 0usize..120) {
            let mut rng = rng(seed);
            let mut field = ObstacleField::generate(&mut rng, 6, 13);
            for _ in 0..steps {
                field.scroll(&mut rng);
            }
            for (i, row) in field.rows().iter().enumerate() {
                prop_assert_eq!(row.index, i);
                prop_assert_eq!(row.items.len(), OBSTACLES_PER_ROW);
                prop_assert!(row.items.iter().all(|o| o.rect.y == row.y));
            }
            // Flattened order keeps index / PER_ROW == row
            for (i, o) in field.iter().enumerate() {
                prop_assert_eq!(o.rect.y, field.rows()[i / OBSTACLES_PER_ROW].y);
            }
        }

        #[test]
        fn prop_rows_stay_evenly_spaced(seed in any::<u64>(), steps in 0usize..200) {
            let mut rng = rng(seed);
            let mut field = CollectibleField::generate(&mut rng, 6, 13);
            for _ in 0..steps {
                field.scroll(&mut rng);
            }
            let mut ys: Vec<i32> = field.rows().iter().map(|r| r.y).collect();
            ys.sort();
            for pair in ys.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], ROW_GAP);
            }
            prop_assert_eq!(field.furthest_row().y, *ys.last().unwrap());
        }
    }
}
