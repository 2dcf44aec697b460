pub mod actor;
pub mod board;
pub mod genre;
pub mod movie;
pub mod pagination;
pub mod reference;
pub mod review;
pub mod tier;
pub mod tier_list;
pub mod watchlist;

pub use actor::{Actor, ActorInput, ActorStats};
pub use board::{BoardError, TierBoard};
pub use genre::{Genre, GenreInput, GenreStats};
pub use movie::{Movie, MovieDetail, MovieFilters, MovieInput, MovieStatus};
pub use pagination::{PageParams, Pagination};
pub use reference::Reference;
pub use review::{
    Review, ReviewFilters, ReviewInput, ReviewStats, ReviewUpdate, ReviewWithMovie, Reviewer,
    ReviewerStats,
};
pub use tier::Tier;
pub use tier_list::{
    AddTierMovieInput, MoveTierMovieInput, TierList, TierListDetail, TierListInput,
    TierListRename, TierListSummary, TierMovie,
};
pub use watchlist::{Priority, WatchlistEntry, WatchlistInput};
