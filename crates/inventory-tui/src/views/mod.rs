//! TUI view components

pub mod detail;
pub mod notifications;
pub mod resources;
pub mod types;

pub use detail::ResourceDetailView;
pub use notifications::NotificationsView;
pub use resources::ResourceTreeView;
pub use types::TypesView;
