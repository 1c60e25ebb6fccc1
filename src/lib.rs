pub mod export;
pub mod feed;
pub mod http_cache;
pub mod http_client;
pub mod leaderboard;
pub mod mock_feed;
pub mod normalize;
pub mod picks;
pub mod pool_params;
pub mod score;
pub mod state;
