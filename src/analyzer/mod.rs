//! Compatibility analysis module.
//!
//! This module classifies repositories against a target PHP version and
//! flags constraints that are too open.
//!
//! # Analysis Types
//!
//! 1. **Compatibility**: Does `require.php` accept the target version?
//!    Repositories without a constraint, or with one that cannot be
//!    parsed, are reported separately instead of as incompatible.
//!
//! 2. **Openness**: Would `require.php` also accept a future major it was
//!    never tested against?
//!
//! # Example
//!
//! ```rust
//! use phpcompat::analyzer::{Analyzer, OpennessAnalyzer};
//! use phpcompat::constraint::Constraint;
//! use phpcompat::Config;
//!
//! let openness = OpennessAnalyzer::default();
//! assert!(openness.is_too_open(&Constraint::parse(">=7.4").unwrap(), 8));
//!
//! let analyzer = Analyzer::new(&Config::default());
//! let result = analyzer.analyze(&[], "8.3").unwrap();
//! assert!(result.verdicts.is_empty());
//! ```

mod compat;
pub mod openness;

pub use compat::Analyzer;
pub use openness::{is_too_open, OpennessAnalyzer};
