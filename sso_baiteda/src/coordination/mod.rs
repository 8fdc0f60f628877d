mod errors;
mod lifecycle;
mod locks;
mod reconcile;

pub use errors::CoordinationError;
pub use lifecycle::{AssociationState, SsoCoordinator, StrategyEntry};
pub use reconcile::Reconciled;
