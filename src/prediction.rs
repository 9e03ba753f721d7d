//! Prediction plumbing around an expensive asynchronous model call.
//!
//! ```text
//! document edit
//!       │
//!       ▼
//! RequestCoalescer ── debounce, cancel superseded request
//!       │
//!       ▼
//! CachedPredictor ── TimedCache | CapacityCache
//!       │ (miss)
//!       ▼
//! HttpPredictor ── POST <base_url>/completions
//!       │
//!       ▼
//! Prediction { old_text, new_text, from, to } ──► diff::extract_operation
//! ```

pub mod backend;
pub mod cache;
pub mod coalescer;
pub mod predictor;
pub mod prompt;
pub mod response;

pub use backend::HttpPredictor;
pub use cache::{
    CachedPredictor, CapacityCache, ConfiguredPredictor, Fingerprint, PredictionCache, TimedCache,
    with_cache_policy,
};
pub use coalescer::{PredictionEvent, RequestCoalescer};
pub use predictor::{EditRegion, EditorState, Prediction, Predictor};
pub use response::{clean_prediction, extract_intent, parse_completion_body};
