pub mod boundary;
pub mod color_scale;
pub mod error;
pub mod highlight;
pub mod index;
pub mod score;
pub mod scroll;
pub mod spatial;
pub mod state;
pub mod table;

pub use boundary::{Bounds, CountryBoundary, JoinedBoundary};
pub use color_scale::{Color, color_for};
pub use error::LoadError;
pub use highlight::{
    HighlightSource, HighlightUpdate, HoverEvent, HoverMachine, InfoPanel, MapStyles,
};
pub use score::{ScoreRecord, SubFactor};
pub use state::AppState;
