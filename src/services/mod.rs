//! Service layer: session registries plus the action resolver that turns
//! user intents into domain mutations, notifications, and timer updates.

pub mod actions;
pub mod session;

pub use actions::ActionResolver;
pub use session::{GameCell, GameHandle, SessionManager};
