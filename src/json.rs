//! Serialisable snapshots of query outcomes

use crate::error::Result;
use crate::fol::{CNFClause, VariableSubstitution};
use crate::resolution::ResolutionQuery;
use serde::{Deserialize, Serialize};

/// A clause as rendered literal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseJson {
    pub literals: Vec<String>,
}

impl ClauseJson {
    pub fn from_clause(clause: &CNFClause) -> Self {
        ClauseJson {
            literals: clause
                .literals()
                .iter()
                .map(|lit| lit.to_string())
                .collect(),
        }
    }
}

/// One variable binding of a unifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingJson {
    pub variable: String,
    pub term: String,
}

fn bindings_json(unifier: &VariableSubstitution) -> Vec<BindingJson> {
    let mut bindings: Vec<BindingJson> = unifier
        .iter()
        .map(|(var, term)| BindingJson {
            variable: var.to_string(),
            term: term.to_string(),
        })
        .collect();
    bindings.sort_by(|a, b| a.variable.cmp(&b.variable));
    bindings
}

/// One recorded resolution inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionStepJson {
    pub resolvent: ClauseJson,
    pub parent1: ClauseJson,
    pub parent2: ClauseJson,
    pub unifier: Vec<BindingJson>,
}

/// Outcome of a completed resolution query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QueryOutcomeJson {
    Proved { steps: Vec<ResolutionStepJson> },
    NotProved,
}

impl ResolutionQuery {
    /// Snapshot a completed query. Fails with `InvalidState` before
    /// completion.
    pub fn to_json(&self) -> Result<QueryOutcomeJson> {
        if !self.result()? {
            return Ok(QueryOutcomeJson::NotProved);
        }
        let steps = self
            .steps()
            .iter()
            .map(|(resolvent, step)| ResolutionStepJson {
                resolvent: ClauseJson::from_clause(resolvent),
                parent1: ClauseJson::from_clause(&step.clause1),
                parent2: ClauseJson::from_clause(&step.clause2),
                unifier: bindings_json(&step.unifier),
            })
            .collect();
        Ok(QueryOutcomeJson::Proved { steps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Literal, Predicate, Term};

    #[test]
    fn test_clause_json_round_trip() {
        let clause = CNFClause::new(vec![
            Literal::positive(Predicate::new("P", vec![Term::constant("a")])),
            Literal::negative(Predicate::new("Q", vec![Term::variable("x")])),
        ]);
        let json = serde_json::to_string(&ClauseJson::from_clause(&clause)).unwrap();
        let parsed: ClauseJson = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.literals.len(), 2);
    }

    #[test]
    fn test_outcome_tags() {
        let not_proved = serde_json::to_value(QueryOutcomeJson::NotProved).unwrap();
        assert_eq!(not_proved["outcome"], "not_proved");

        let proved = serde_json::to_value(QueryOutcomeJson::Proved { steps: vec![] }).unwrap();
        assert_eq!(proved["outcome"], "proved");
    }
}
