//! Rule-Based Shortcut Verdicts
//!
//! Provides domain rules that settle a verdict before any dataset is loaded
//! or model trained.

mod rules;

pub use rules::{ShortcutRule, Verdict, VerdictSource};
