//! Output generation for one-shot fetches.
//!
//! # Submodules
//!
//! - [`json`]: Writes a `FetchResult` to a dated JSON file or stdout
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── ALL.json
//!     └── ROCKETS.json
//! ```

pub mod json;
