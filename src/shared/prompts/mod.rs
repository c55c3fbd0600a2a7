//! Prompt template interpolation.
//!
//! Pure string substitution with no knowledge of categories or backends.
//!
//! # Usage
//!
//! ```ignore
//! use serde_json::json;
//! use crate::shared::prompts::{interpolate, VariableBag};
//!
//! let mut vars = VariableBag::new();
//! vars.insert("topic".into(), json!("pricing"));
//! vars.insert("audience".into(), json!(["founders", "CFOs"]));
//!
//! let prompt = interpolate("Write about {{topic}} for {{audience}}.", &vars);
//! assert_eq!(prompt, "Write about pricing for founders, CFOs.");
//! ```

pub mod engine;

pub use engine::{interpolate, placeholders, VariableBag};
