pub mod app;
pub mod config;
pub mod coordinator;
pub mod dashboard;
pub mod errors;
pub mod fetch;
pub mod handlers;
pub mod legend;
pub mod map_view;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod state;
pub mod store;
pub mod timeline;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use dashboard::Dashboard;
pub use state::AppState;
pub use store::AggregateStore;
