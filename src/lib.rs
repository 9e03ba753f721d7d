//! Edit-prediction engine.
//!
//! Reduces a model's rewrite of an editable region to a single minimal
//! [`DiffOperation`], and wraps the model call with caching, debouncing
//! and cancellation.

pub mod config;
pub mod diff;
pub mod error;
pub mod prediction;
pub mod text;

pub use config::{ResolvedSettings, load_settings};
pub use diff::{DiffOperation, DiffText, apply_operation, apply_to_document, extract_operation};
pub use error::{PredictionError, PredictionResult};
pub use prediction::{EditorState, HttpPredictor, Prediction, PredictionEvent, Predictor, RequestCoalescer};
pub use text::{CURSOR_MARKER, Selection};
