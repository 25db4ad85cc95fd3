//! Maskrace - reproduce mid-run secret rotation leaks in CI log masking.
//!
//! A CI runner builds each job's masking dictionary from the secrets it
//! knows when the job starts. Rotating a secret while a run is in flight
//! can therefore let a downstream job print the old value in cleartext.
//! Maskrace drives the hosted service through that race and classifies the
//! resulting logs.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/               # Command-line interface
//! │   ├── experiment     # cross-job, mitigated, late, rapid, bypass
//! │   ├── analyze        # Offline classification of a saved log
//! │   ├── workflows      # Install bundled workflow definitions
//! │   ├── report         # Matrix and table rendering
//! │   └── completions    # Shell completions
//! └── core/              # Core library components
//!     ├── platform/      # CI platform trait
//!     │   └── gh         # gh CLI implementation
//!     ├── poll           # Fixed-interval bounded/unbounded polling
//!     ├── lease          # Scoped secret ownership with reset on drop
//!     ├── orchestrator   # Trigger, discover, synchronize, rotate
//!     ├── log            # Per-job log partitioning
//!     ├── transform      # Encoded forms of a value
//!     ├── classify       # LEAKED / MASKED / NOT FOUND / SKIPPED
//!     ├── matrix         # Job × version matrix and its interpretation
//!     └── experiment     # Variant recipes and reports
//! ```

pub mod cli;
pub mod core;
pub mod error;
