//! Literals: atomic predicate applications with a sign

use super::sentence::Predicate;
use super::term::Variable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A literal (positive or negative predicate application)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub predicate: Predicate,
    pub polarity: bool, // true = positive, false = negated
}

impl Literal {
    /// Create a new positive literal
    pub fn positive(predicate: Predicate) -> Self {
        Literal {
            predicate,
            polarity: true,
        }
    }

    /// Create a new negative literal
    pub fn negative(predicate: Predicate) -> Self {
        Literal {
            predicate,
            polarity: false,
        }
    }

    pub fn is_negated(&self) -> bool {
        !self.polarity
    }

    /// Get the complement of this literal
    pub fn complement(&self) -> Literal {
        Literal {
            predicate: self.predicate.clone(),
            polarity: !self.polarity,
        }
    }

    pub fn is_ground(&self) -> bool {
        self.predicate.is_ground()
    }

    /// Collect all variables in this literal
    pub fn collect_variables(&self, vars: &mut HashSet<Variable>) {
        self.predicate.collect_variables(vars);
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.polarity {
            write!(f, "¬")?;
        }
        write!(f, "{}", self.predicate)
    }
}
