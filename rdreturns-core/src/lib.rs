//! rdreturns core library - benefit-cost ratio engines for R&D investment
//!
//! Global invariants enforced in this crate:
//! - The engines are pure functions of their parameter records
//! - No global mutable state
//! - No randomness, clocks, threads, or async
//! - Results are recomputed from parameters, never edited in place
//! - Full precision is kept until the report layer formats values

pub mod capital;
pub mod config;
pub mod input;
pub mod interpret;
pub mod presets;
pub mod private;
pub mod public;
pub mod report;
pub mod sensitivity;
pub mod session;
pub mod terms;
pub mod toolkit;

pub use config::ResolvedConfig;
pub use interpret::{classify, Interpretation, Perspective, Severity};
pub use presets::{PrivatePreset, PublicPreset};
pub use private::{compute_private_bcr, PrivateField, PrivateRdParams, PrivateRdResults};
pub use public::{compute_public_bcr, PublicField, PublicRdParams, PublicRdResults};
pub use report::{render_json, render_text, CalculationReport};
pub use session::Calculator;
