//! Host-side pieces of `facetview`: directory resolution, logging setup and
//! the file-backed state store. The engine itself lives in
//! [`facetview_engine`] and is re-exported here for convenience.

pub mod app_dirs;
pub mod logging;
pub mod store;

pub use facetview_engine as engine;
pub use store::FileStore;
