pub mod error;
pub mod flat;
pub mod snapshot;

pub use error::SimIndexError;
pub use flat::{FlatIndex, Match};
pub use snapshot::{load as load_snapshot, save as save_snapshot};
