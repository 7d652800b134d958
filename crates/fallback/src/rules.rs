//! Shortcut Rule Evaluation

use serde::{Deserialize, Serialize};
use tracing::info;
use water_validator::{Binary, Observation, Quality};

/// Where a verdict came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// Fixed verdict from the shortcut rule
    Shortcut,
    /// Trained classifiers
    Model,
}

/// One label per classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub logistic_regression: Quality,
    pub random_forest: Quality,
    pub source: VerdictSource,
}

impl Verdict {
    /// Verdict with both classifiers rejecting the sample
    pub fn rejected() -> Self {
        Self {
            logistic_regression: Quality::TidakLayak,
            random_forest: Quality::TidakLayak,
            source: VerdictSource::Shortcut,
        }
    }
}

/// Taste/Odor shortcut: a sample failing both is unacceptable regardless of
/// the other measurements.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortcutRule;

impl ShortcutRule {
    pub fn new() -> Self {
        Self
    }

    /// Returns the fixed verdict when the rule applies
    pub fn evaluate(&self, observation: &Observation) -> Option<Verdict> {
        if observation.taste == Binary::Unacceptable && observation.odor == Binary::Unacceptable {
            info!("Shortcut rule fired: taste and odor both unacceptable");
            Some(Verdict::rejected())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scenario_a_short_circuits() {
        let obs = Observation {
            ph: 7.0,
            temperature: 25.0,
            taste: Binary::Unacceptable,
            odor: Binary::Unacceptable,
            fat: 1.0,
            turbidity: 1.0,
            colour: 250,
        };
        let verdict = ShortcutRule::new().evaluate(&obs).unwrap();
        assert_eq!(verdict.logistic_regression, Quality::TidakLayak);
        assert_eq!(verdict.random_forest, Quality::TidakLayak);
        assert_eq!(verdict.source, VerdictSource::Shortcut);
    }

    #[test]
    fn test_single_failure_does_not_short_circuit() {
        let rule = ShortcutRule::new();
        let taste_only = Observation {
            taste: Binary::Acceptable,
            ..Default::default()
        };
        let odor_only = Observation {
            odor: Binary::Acceptable,
            ..Default::default()
        };
        assert!(rule.evaluate(&taste_only).is_none());
        assert!(rule.evaluate(&odor_only).is_none());
    }

    proptest! {
        #[test]
        fn prop_rule_ignores_other_measurements(
            ph in 0.0f64..=14.0,
            temperature in 0.0f64..100.0,
            fat in 0.0f64..10.0,
            turbidity in 0.0f64..10.0,
            colour in 240u16..=255,
        ) {
            let obs = Observation {
                ph,
                temperature,
                taste: Binary::Unacceptable,
                odor: Binary::Unacceptable,
                fat,
                turbidity,
                colour,
            };
            prop_assert_eq!(ShortcutRule::new().evaluate(&obs), Some(Verdict::rejected()));
        }
    }
}
