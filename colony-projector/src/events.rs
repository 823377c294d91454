mod chain_event;
mod colony_event;

pub use chain_event::{ChainEvent, UnsavedChainEvent};
pub use colony_event::ColonyEvent;
