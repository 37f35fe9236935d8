//! Job envelope types shared by the sidebar bridge and its collaborators.
//!
//! Every call from the spreadsheet sidebar carries a single [`Job`]: a sparse,
//! serializable record that operations decorate in place and hand back. The
//! types here only describe the shape of that record; the dispatch protocol
//! that moves it across the text boundary lives in `sidebar-bridge`.
//!
//! Fields the bridge does not model are kept in [`Job::extra`] and
//! [`SubJob::extra`], so a payload produced by the sidebar survives a decode
//! and re-encode without losing anything.
//!
//! ```json
//! {"entity":"Campaign","idsToLoad":[1001,1002],"jobs":[{"logs":[["INFO","start"]]}]}
//! ```

mod ids;
mod job;
mod log_row;

pub use self::ids::{IdMap, ItemId, JobId, JobIdParseError};
pub use self::job::{Job, SubJob};
pub use self::log_row::LogRow;
