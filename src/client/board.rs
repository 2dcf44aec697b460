use std::collections::BTreeMap;

use crate::models::{Movie, Tier, TierListDetail, TierMovie};

use super::{ClientError, TierListApi};

/// Severity of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Single notification seam for everything the board editor has to tell the
/// user; the application constructs one notifier and hands it to every view.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Notifier that forwards notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => tracing::info!(notice = %message, "User notice"),
            NoticeLevel::Error => tracing::error!(notice = %message, "User notice"),
        }
    }
}

/// Where the board editor stands relative to the server
///
/// `Clean` means local state matches the last server answer. `Optimistic`
/// covers the window between a local mutation and its acknowledgement.
/// `Reverting` is entered when the server refused a mutation and the
/// authoritative state is being re-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Clean,
    Optimistic,
    Reverting,
}

/// Client-side picture of a tier list: the six buckets plus the unassigned
/// pool, all as uniform movie cards
#[derive(Debug, Clone)]
pub struct BoardView {
    pub tiers: BTreeMap<Tier, Vec<TierMovie>>,
    pub unassigned: Vec<TierMovie>,
}

impl BoardView {
    fn from_detail(detail: &TierListDetail) -> Self {
        Self {
            tiers: detail.tiers.clone(),
            unassigned: detail.unassigned.iter().map(card_from_movie).collect(),
        }
    }

    fn find_in_tiers(&self, movie_id: i64) -> Option<(Tier, usize)> {
        for tier in Tier::ALL {
            if let Some(bucket) = self.tiers.get(&tier) {
                if let Some(idx) = bucket.iter().position(|m| m.movie_id == movie_id) {
                    return Some((tier, idx));
                }
            }
        }
        None
    }

    fn find_in_unassigned(&self, movie_id: i64) -> Option<usize> {
        self.unassigned.iter().position(|m| m.movie_id == movie_id)
    }

    fn take_from_tier(&mut self, tier: Tier, idx: usize) -> TierMovie {
        let card = self.tiers.entry(tier).or_default().remove(idx);
        renumber(self.tiers.entry(tier).or_default());
        card
    }

    fn insert_into_tier(&mut self, tier: Tier, index: usize, card: TierMovie) {
        let bucket = self.tiers.entry(tier).or_default();
        let index = index.min(bucket.len());
        bucket.insert(index, card);
        renumber(bucket);
    }

    fn return_to_unassigned(&mut self, card: TierMovie) {
        self.unassigned.push(card);
        self.unassigned.sort_by(|a, b| a.title.cmp(&b.title));
    }

    /// Total number of cards across buckets
    pub fn assigned_count(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }
}

fn renumber(bucket: &mut [TierMovie]) {
    for (pos, card) in bucket.iter_mut().enumerate() {
        card.position = pos as i32;
    }
}

fn card_from_movie(movie: &Movie) -> TierMovie {
    TierMovie {
        movie_id: movie.id,
        title: movie.title.clone(),
        original_title: movie.original_title.clone(),
        release_year: movie.release_year,
        poster_url: movie.poster_url.clone(),
        position: 0,
    }
}

/// Drag-and-drop editor for one tier list
///
/// Every mutation is applied to local state first, then persisted; when the
/// server refuses, the optimistic state is discarded and the authoritative
/// board is re-fetched. There is no finer-grained rollback.
pub struct BoardEditor<A, N> {
    api: A,
    notifier: N,
    list_id: i64,
    board: BoardView,
    phase: EditPhase,
}

impl<A: TierListApi, N: Notifier> BoardEditor<A, N> {
    /// Fetches the list and constructs an editor over it
    pub async fn load(api: A, notifier: N, list_id: i64) -> Result<Self, ClientError> {
        let detail = api.fetch(list_id).await?;
        Ok(Self {
            api,
            notifier,
            list_id,
            board: BoardView::from_detail(&detail),
            phase: EditPhase::Clean,
        })
    }

    pub fn board(&self) -> &BoardView {
        &self.board
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    /// Drop into a tier's open zone: the card lands at the top of the bucket
    pub async fn drop_into_tier(&mut self, movie_id: i64, tier: Tier) -> Result<(), ClientError> {
        self.place(movie_id, tier, 0).await
    }

    /// Drop onto a movie slot: the card is spliced in at that index
    pub async fn drop_onto_slot(
        &mut self,
        movie_id: i64,
        tier: Tier,
        index: usize,
    ) -> Result<(), ClientError> {
        self.place(movie_id, tier, index).await
    }

    async fn place(&mut self, movie_id: i64, tier: Tier, index: usize) -> Result<(), ClientError> {
        if let Some((from_tier, from_idx)) = self.board.find_in_tiers(movie_id) {
            // Splicing out first makes the index refer to the bucket as the
            // user sees it after the card left its old slot
            let card = self.board.take_from_tier(from_tier, from_idx);
            self.board.insert_into_tier(tier, index, card);

            self.phase = EditPhase::Optimistic;
            let result = self
                .api
                .move_movie(self.list_id, movie_id, tier, index as i32)
                .await;
            self.settle(result).await
        } else if let Some(idx) = self.board.find_in_unassigned(movie_id) {
            let card = self.board.unassigned.remove(idx);
            self.board.insert_into_tier(tier, index, card);

            self.phase = EditPhase::Optimistic;
            let result = self
                .api
                .add_movie(self.list_id, movie_id, tier, index as i32)
                .await;
            self.settle(result).await
        } else {
            self.notifier
                .notify(NoticeLevel::Error, "Movie is not on this board");
            Ok(())
        }
    }

    /// Removes a card from its bucket, returning it to the unassigned pool
    pub async fn remove(&mut self, movie_id: i64) -> Result<(), ClientError> {
        let Some((tier, idx)) = self.board.find_in_tiers(movie_id) else {
            self.notifier
                .notify(NoticeLevel::Error, "Movie is not placed in any tier");
            return Ok(());
        };

        let card = self.board.take_from_tier(tier, idx);
        self.board.return_to_unassigned(card);

        self.phase = EditPhase::Optimistic;
        let result = self.api.remove_movie(self.list_id, movie_id).await;
        self.settle(result).await
    }

    /// Confirms the optimistic state or reverts to the server's
    async fn settle(&mut self, result: Result<(), ClientError>) -> Result<(), ClientError> {
        match result {
            Ok(()) => {
                self.phase = EditPhase::Clean;
                Ok(())
            }
            Err(err) => {
                self.phase = EditPhase::Reverting;
                self.notifier
                    .notify(NoticeLevel::Error, &format!("Saving failed: {}", err));

                match self.api.fetch(self.list_id).await {
                    Ok(detail) => {
                        self.board = BoardView::from_detail(&detail);
                    }
                    Err(refetch_err) => {
                        // Stale optimistic state stays on screen; the user is
                        // told rather than silently shown wrong data
                        self.notifier.notify(
                            NoticeLevel::Error,
                            &format!("Reloading the board failed: {}", refetch_err),
                        );
                    }
                }
                self.phase = EditPhase::Clean;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tier_lists::MockTierListApi;
    use crate::models::TierList;
    use chrono::Utc;
    use std::sync::Mutex;

    struct RecordingNotifier {
        notices: Mutex<Vec<(NoticeLevel, String)>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                notices: Mutex::new(Vec::new()),
            }
        }

        fn errors(&self) -> usize {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .filter(|(level, _)| *level == NoticeLevel::Error)
                .count()
        }
    }

    impl Notifier for &RecordingNotifier {
        fn notify(&self, level: NoticeLevel, message: &str) {
            self.notices
                .lock()
                .unwrap()
                .push((level, message.to_string()));
        }
    }

    fn card(movie_id: i64, title: &str, position: i32) -> TierMovie {
        TierMovie {
            movie_id,
            title: title.to_string(),
            original_title: None,
            release_year: 2000,
            poster_url: None,
            position,
        }
    }

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            original_title: None,
            release_year: 2000,
            director: None,
            poster_url: None,
            trailer_url: None,
            duration: None,
            description: None,
            country: None,
            language: None,
            status: "watched".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            genres: None,
            avg_rating: None,
        }
    }

    fn detail() -> TierListDetail {
        let list = TierList {
            id: 1,
            name: "Боевики".to_string(),
            created_at: Utc::now(),
        };
        let rows = vec![
            (Tier::S, card(10, "Леон", 0)),
            (Tier::S, card(20, "Матрица", 1)),
            (Tier::S, card(30, "Олдбой", 2)),
            (Tier::A, card(40, "Хищник", 0)),
        ];
        TierListDetail::assemble(list, rows, vec![movie(50, "Терминатор")])
    }

    fn ids(bucket: &[TierMovie]) -> Vec<i64> {
        bucket.iter().map(|m| m.movie_id).collect()
    }

    #[tokio::test]
    async fn test_same_tier_reorder_splices_and_renumbers() {
        let mut api = MockTierListApi::new();
        api.expect_fetch().returning(|_| Ok(detail()));
        api.expect_move_movie()
            .withf(|list, movie, tier, pos| {
                *list == 1 && *movie == 10 && *tier == Tier::S && *pos == 2
            })
            .returning(|_, _, _, _| Ok(()));

        let notifier = RecordingNotifier::new();
        let mut editor = BoardEditor::load(api, &notifier, 1).await.unwrap();

        editor.drop_onto_slot(10, Tier::S, 2).await.unwrap();

        let bucket = &editor.board().tiers[&Tier::S];
        assert_eq!(ids(bucket), vec![20, 30, 10]);
        let positions: Vec<i32> = bucket.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(editor.phase(), EditPhase::Clean);
        assert_eq!(notifier.errors(), 0);
    }

    #[tokio::test]
    async fn test_cross_tier_drop_lands_at_top_and_conserves() {
        let mut api = MockTierListApi::new();
        api.expect_fetch().returning(|_| Ok(detail()));
        api.expect_move_movie().returning(|_, _, _, _| Ok(()));

        let notifier = RecordingNotifier::new();
        let mut editor = BoardEditor::load(api, &notifier, 1).await.unwrap();
        let before = editor.board().assigned_count();

        editor.drop_into_tier(20, Tier::A).await.unwrap();

        assert_eq!(editor.board().assigned_count(), before);
        assert_eq!(ids(&editor.board().tiers[&Tier::S]), vec![10, 30]);
        assert_eq!(ids(&editor.board().tiers[&Tier::A]), vec![20, 40]);
    }

    #[tokio::test]
    async fn test_drop_from_unassigned_issues_add() {
        let mut api = MockTierListApi::new();
        api.expect_fetch().returning(|_| Ok(detail()));
        api.expect_add_movie()
            .withf(|list, movie, tier, pos| {
                *list == 1 && *movie == 50 && *tier == Tier::B && *pos == 0
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let notifier = RecordingNotifier::new();
        let mut editor = BoardEditor::load(api, &notifier, 1).await.unwrap();

        editor.drop_into_tier(50, Tier::B).await.unwrap();

        assert!(editor.board().unassigned.is_empty());
        assert_eq!(ids(&editor.board().tiers[&Tier::B]), vec![50]);
    }

    #[tokio::test]
    async fn test_server_error_discards_optimistic_state() {
        let mut api = MockTierListApi::new();
        api.expect_fetch().returning(|_| Ok(detail()));
        api.expect_move_movie().returning(|_, _, _, _| {
            Err(ClientError::Api {
                status: 400,
                message: "Movie is already in this tier list".to_string(),
            })
        });

        let notifier = RecordingNotifier::new();
        let mut editor = BoardEditor::load(api, &notifier, 1).await.unwrap();

        let result = editor.drop_onto_slot(10, Tier::S, 2).await;

        assert!(result.is_err());
        // Re-fetched authoritative order, not the optimistic one
        assert_eq!(ids(&editor.board().tiers[&Tier::S]), vec![10, 20, 30]);
        assert_eq!(editor.phase(), EditPhase::Clean);
        assert_eq!(notifier.errors(), 1);
    }

    #[tokio::test]
    async fn test_remove_returns_card_to_unassigned() {
        let mut api = MockTierListApi::new();
        api.expect_fetch().returning(|_| Ok(detail()));
        api.expect_remove_movie()
            .withf(|list, movie| *list == 1 && *movie == 40)
            .times(1)
            .returning(|_, _| Ok(()));

        let notifier = RecordingNotifier::new();
        let mut editor = BoardEditor::load(api, &notifier, 1).await.unwrap();
        let before = editor.board().assigned_count();

        editor.remove(40).await.unwrap();

        assert_eq!(editor.board().assigned_count(), before - 1);
        assert!(editor.board().tiers[&Tier::A].is_empty());
        let unassigned: Vec<i64> = ids(&editor.board().unassigned);
        assert!(unassigned.contains(&40));
    }

    #[tokio::test]
    async fn test_unknown_movie_is_reported_not_sent() {
        let mut api = MockTierListApi::new();
        api.expect_fetch().returning(|_| Ok(detail()));
        // No add/move expectation: the editor must not call the server

        let notifier = RecordingNotifier::new();
        let mut editor = BoardEditor::load(api, &notifier, 1).await.unwrap();

        editor.drop_into_tier(999, Tier::S).await.unwrap();

        assert_eq!(notifier.errors(), 1);
        assert_eq!(editor.phase(), EditPhase::Clean);
    }
}
