use std::collections::BTreeMap;

use super::Tier;

/// In-memory picture of one tier list: six ordered buckets of movie ids
///
/// Position is implicit in vector order, so every mutation keeps buckets dense
/// by construction. The server services and the client board editor both drive
/// their bucket bookkeeping through this type, which is where the ordering
/// invariants are enforced and tested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierBoard {
    buckets: BTreeMap<Tier, Vec<i64>>,
}

impl TierBoard {
    /// Creates an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from (tier, movie_id) rows ordered by stored position
    pub fn from_rows(rows: impl IntoIterator<Item = (Tier, i64)>) -> Self {
        let mut board = Self::new();
        for (tier, movie_id) in rows {
            board.bucket_mut(tier).push(movie_id);
        }
        board
    }

    /// Movies of one bucket in position order
    pub fn bucket(&self, tier: Tier) -> &[i64] {
        self.buckets.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    fn bucket_mut(&mut self, tier: Tier) -> &mut Vec<i64> {
        self.buckets.entry(tier).or_default()
    }

    /// Locates a movie, returning its tier and index
    pub fn find(&self, movie_id: i64) -> Option<(Tier, usize)> {
        for tier in Tier::ALL {
            if let Some(idx) = self.bucket(tier).iter().position(|&id| id == movie_id) {
                return Some((tier, idx));
            }
        }
        None
    }

    /// Whether the movie is assigned to any bucket
    pub fn contains(&self, movie_id: i64) -> bool {
        self.find(movie_id).is_some()
    }

    /// Total number of assigned movies across all buckets
    pub fn assigned_count(&self) -> usize {
        Tier::ALL.iter().map(|&t| self.bucket(t).len()).sum()
    }

    /// Inserts a movie that is not yet on the board
    ///
    /// The index is clamped to the bucket length; later movies shift down one
    /// slot. Returns an error if the movie already occupies a bucket, since a
    /// movie can appear at most once per list.
    pub fn insert(&mut self, movie_id: i64, tier: Tier, index: usize) -> Result<(), BoardError> {
        if self.contains(movie_id) {
            return Err(BoardError::AlreadyAssigned(movie_id));
        }
        let bucket = self.bucket_mut(tier);
        let index = index.min(bucket.len());
        bucket.insert(index, movie_id);
        Ok(())
    }

    /// Moves an assigned movie to a (possibly different) tier and index
    ///
    /// Within one bucket this is the splice-and-reinsert a drag-onto-slot drop
    /// performs; across buckets it removes from the source and inserts at the
    /// destination index. Either way no movie is duplicated or lost.
    pub fn move_to(&mut self, movie_id: i64, tier: Tier, index: usize) -> Result<(), BoardError> {
        let (from_tier, from_idx) = self
            .find(movie_id)
            .ok_or(BoardError::NotAssigned(movie_id))?;
        self.bucket_mut(from_tier).remove(from_idx);
        let bucket = self.bucket_mut(tier);
        let index = index.min(bucket.len());
        bucket.insert(index, movie_id);
        Ok(())
    }

    /// Removes a movie from the board, returning the bucket it occupied
    pub fn remove(&mut self, movie_id: i64) -> Result<Tier, BoardError> {
        let (tier, idx) = self
            .find(movie_id)
            .ok_or(BoardError::NotAssigned(movie_id))?;
        self.bucket_mut(tier).remove(idx);
        Ok(tier)
    }

    /// (tier, movie_id, position) triples for every assignment, dense per bucket
    pub fn positions(&self) -> Vec<(Tier, i64, i32)> {
        let mut out = Vec::with_capacity(self.assigned_count());
        for tier in Tier::ALL {
            for (pos, &movie_id) in self.bucket(tier).iter().enumerate() {
                out.push((tier, movie_id, pos as i32));
            }
        }
        out
    }
}

/// Errors from board mutations, mapped to domain errors at the service boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    AlreadyAssigned(i64),
    NotAssigned(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_s_tier(ids: &[i64]) -> TierBoard {
        TierBoard::from_rows(ids.iter().map(|&id| (Tier::S, id)))
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut board = TierBoard::new();
        board.insert(1, Tier::A, 99).unwrap();
        board.insert(2, Tier::A, 99).unwrap();
        assert_eq!(board.bucket(Tier::A), &[1, 2]);
    }

    #[test]
    fn test_insert_duplicate_rejected() {
        let mut board = board_with_s_tier(&[1]);
        // A movie cannot occupy two buckets of one list, even a different tier
        assert_eq!(
            board.insert(1, Tier::B, 0),
            Err(BoardError::AlreadyAssigned(1))
        );
    }

    #[test]
    fn test_within_tier_reorder_renumbers_densely() {
        let mut board = board_with_s_tier(&[10, 20, 30]);
        // Move the head to the tail: [A,B,C] with A to index 2 gives [B,C,A]
        board.move_to(10, Tier::S, 2).unwrap();
        assert_eq!(board.bucket(Tier::S), &[20, 30, 10]);
        let positions: Vec<i32> = board
            .positions()
            .iter()
            .map(|&(_, _, pos)| pos)
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_cross_tier_move_conserves_movies() {
        let mut board = board_with_s_tier(&[1, 2, 3]);
        board.insert(4, Tier::A, 0).unwrap();
        let before = board.assigned_count();

        board.move_to(2, Tier::A, 0).unwrap();

        assert_eq!(board.assigned_count(), before);
        assert_eq!(board.bucket(Tier::S), &[1, 3]);
        assert_eq!(board.bucket(Tier::A), &[2, 4]);
        assert_eq!(board.find(2), Some((Tier::A, 0)));
    }

    #[test]
    fn test_move_unassigned_rejected() {
        let mut board = board_with_s_tier(&[1]);
        assert_eq!(board.move_to(9, Tier::A, 0), Err(BoardError::NotAssigned(9)));
    }

    #[test]
    fn test_remove_renumbers_remaining() {
        let mut board = board_with_s_tier(&[1, 2, 3]);
        let tier = board.remove(2).unwrap();
        assert_eq!(tier, Tier::S);
        assert_eq!(board.bucket(Tier::S), &[1, 3]);
        assert_eq!(
            board.positions(),
            vec![(Tier::S, 1, 0), (Tier::S, 3, 1)]
        );
    }

    #[test]
    fn test_remove_absent_rejected() {
        let mut board = TierBoard::new();
        assert_eq!(board.remove(5), Err(BoardError::NotAssigned(5)));
    }

    #[test]
    fn test_positions_dense_per_bucket() {
        let mut board = TierBoard::new();
        board.insert(1, Tier::S, 0).unwrap();
        board.insert(2, Tier::F, 0).unwrap();
        board.insert(3, Tier::F, 0).unwrap();
        assert_eq!(
            board.positions(),
            vec![(Tier::S, 1, 0), (Tier::F, 3, 0), (Tier::F, 2, 1)]
        );
    }
}
