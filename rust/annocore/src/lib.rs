//! AnnoCore: Range-Annotated Text Renderer
//!
//! A Rust/WASM implementation of the highlight and correction rendering used
//! by the dashboard's scan views (text verification, misinformation
//! detection, AI-section highlighting).
//!
//! # Architecture
//!
//! - `units.rs` - UnitMap: UTF-16 code-unit offsets to byte spans
//! - `range.rs` - TextRange + RangeIndex: inclusive spans, point queries, clamping
//! - `annotate.rs` - Annotator: per-character descriptors, highlight runs
//! - `reconstruct.rs` - TextReconstructor: descending splice, replacement location
//! - `adapters.rs` - Service shapes (TextCorrection, DetectedIssue, DetectedSection)
//! - `report.rs` - Summaries + lenient scan-result normalization
//! - `change.rs` - ChangeDetector: skip unchanged renders
//! - `cortex.rs` - RenderCortex: one-call facade for JS
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { RenderCortex } from 'annocore';
//!
//! await init();
//!
//! const cortex = new RenderCortex({ highlight_enabled: true });
//!
//! const result = cortex.renderCorrections(
//!   "Teh invoice total",
//!   [{ original: 'Teh', corrected: 'The', position: { start: 0, end: 2 }, confidence: 96 }]
//! );
//!
//! console.log(result.segments);           // Highlight runs + tooltips
//! console.log(result.corrected);          // "The invoice total"
//! console.log(result.corrected_segments); // What changed, underlined
//! console.log(result.summary);            // { total, accuracy_rate, status }
//! ```

pub mod adapters;
pub mod annotate;
pub mod change;
pub mod config;
pub mod cortex;
pub mod error;
pub mod range;
pub mod reconstruct;
pub mod report;
pub mod units;

#[cfg(test)]
mod tests;

pub use adapters::*;
pub use annotate::*;
pub use change::*;
pub use config::*;
pub use cortex::*;
pub use error::*;
pub use range::*;
pub use reconstruct::*;
pub use report::*;
pub use units::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("annocore v{}", env!("CARGO_PKG_VERSION"))
}
