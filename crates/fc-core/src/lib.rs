pub mod connect;
pub mod error;
pub mod id;
pub mod ledger;
pub mod model;
pub mod store;
pub mod style;

pub use connect::{ConnectionBuilder, ConnectionGesture, ConnectionPolicy};
pub use error::{GestureError, StoreError};
pub use id::ElementId;
pub use ledger::Highlight;
pub use model::*;
pub use store::{ElementStore, Removed};
pub use style::*;
