pub mod crypto;
mod error;
pub mod format;
pub mod search;

pub use crate::error::{FormatError, InputParseError, WindowError};
pub use crate::format::CiphertextContainer;
pub use crate::search::{
    DEFAULT_PROGRESS_INTERVAL, KeySpaceSearcher, Progress, SearchResult, SearchWindow, search,
    window,
};
