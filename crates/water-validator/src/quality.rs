//! Acceptability Labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Water quality verdict for one classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    /// Grade 1, acceptable
    #[serde(rename = "Layak")]
    Layak,
    /// Grade 0, not acceptable
    #[serde(rename = "Tidak Layak")]
    TidakLayak,
}

impl Quality {
    /// Map a class label (1 = acceptable, anything else = not acceptable)
    pub fn from_label(label: usize) -> Self {
        if label == 1 {
            Quality::Layak
        } else {
            Quality::TidakLayak
        }
    }

    /// Display text
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Layak => "Layak",
            Quality::TidakLayak => "Tidak Layak",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
