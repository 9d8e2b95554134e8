//! Legend-producing pretty printer
//!
//! Normalisation symbols (standardised variables, Skolem functions) have
//! globally-unique raw renderings that are unreadable in explanations. A
//! [`SentenceFormatter`] binds each symbol it encounters to a short label
//! drawn from a configurable label set (by default lowercase Greek for
//! standardised variables and uppercase Latin for Skolem functions) and
//! renders a legend describing each label's provenance. Labels are bound
//! per formatter instance.

use crate::error::{EntailError, Result};
use crate::fol::{
    CNFClause, FunctionName, Literal, Predicate, Sentence, SkolemFunction,
    StandardisedVariable, Term, VariableSubstitution, VariableSymbol,
};
use indexmap::IndexMap;

const GREEK_LOWERCASE: &[&str] = &[
    "α", "β", "γ", "δ", "ε", "ζ", "η", "θ", "ι", "κ", "λ", "μ", "ν", "ξ", "ο", "π", "ρ", "σ",
    "τ", "υ", "φ", "χ", "ψ", "ω",
];

const LATIN_UPPERCASE: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z",
];

/// A finite, ordered pool of labels.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new(labels: Vec<String>) -> Self {
        LabelSet { labels }
    }

    pub fn greek_lowercase() -> Self {
        LabelSet::new(GREEK_LOWERCASE.iter().map(|s| s.to_string()).collect())
    }

    pub fn latin_uppercase() -> Self {
        LabelSet::new(LATIN_UPPERCASE.iter().map(|s| s.to_string()).collect())
    }

    fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

/// Configuration of a formatter factory. The defaults are process-wide
/// conventions, applied at construction rather than read from mutable
/// global state.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    pub standardised_labels: LabelSet,
    pub skolem_labels: LabelSet,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig {
            standardised_labels: LabelSet::greek_lowercase(),
            skolem_labels: LabelSet::latin_uppercase(),
        }
    }
}

/// Pretty printer binding fresh labels to normalisation symbols.
///
/// Enumerating a label set beyond its capacity fails with
/// [`EntailError::LabelsExhausted`].
#[derive(Debug, Default)]
pub struct SentenceFormatter {
    config: FormatterConfig,
    standardised: IndexMap<u64, (String, StandardisedVariable)>,
    skolems: IndexMap<u64, (String, SkolemFunction)>,
}

impl SentenceFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        SentenceFormatter {
            config,
            ..Self::default()
        }
    }

    fn label_for_standardised(&mut self, symbol: &StandardisedVariable) -> Result<String> {
        if let Some((label, _)) = self.standardised.get(&symbol.id()) {
            return Ok(label.clone());
        }
        let label = self
            .config
            .standardised_labels
            .get(self.standardised.len())
            .ok_or(EntailError::LabelsExhausted)?
            .to_string();
        self.standardised
            .insert(symbol.id(), (label.clone(), symbol.clone()));
        Ok(label)
    }

    fn label_for_skolem(&mut self, symbol: &SkolemFunction) -> Result<String> {
        if let Some((label, _)) = self.skolems.get(&symbol.id()) {
            return Ok(label.clone());
        }
        let label = self
            .config
            .skolem_labels
            .get(self.skolems.len())
            .ok_or(EntailError::LabelsExhausted)?
            .to_string();
        self.skolems
            .insert(symbol.id(), (label.clone(), symbol.clone()));
        Ok(label)
    }

    pub fn format_term(&mut self, term: &Term) -> Result<String> {
        let mut out = String::new();
        self.write_term(term, &mut out)?;
        Ok(out)
    }

    fn write_term(&mut self, term: &Term, out: &mut String) -> Result<()> {
        match term {
            Term::Variable(v) => match &v.symbol {
                VariableSymbol::Named(name) => out.push_str(name),
                VariableSymbol::Standardised(sv) => {
                    let label = self.label_for_standardised(sv)?;
                    out.push_str(&label);
                }
            },
            Term::Constant(c) => out.push_str(&c.name),
            Term::Function(symbol, args) => {
                match &symbol.name {
                    FunctionName::Named(name) => out.push_str(name),
                    FunctionName::Skolem(sk) => {
                        let label = self.label_for_skolem(sk)?;
                        out.push_str(&label);
                    }
                }
                if !args.is_empty() {
                    out.push('(');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push(',');
                        }
                        self.write_term(arg, out)?;
                    }
                    out.push(')');
                }
            }
        }
        Ok(())
    }

    pub fn format_predicate(&mut self, predicate: &Predicate) -> Result<String> {
        let mut out = String::new();
        self.write_predicate(predicate, &mut out)?;
        Ok(out)
    }

    fn write_predicate(&mut self, predicate: &Predicate, out: &mut String) -> Result<()> {
        out.push_str(&predicate.symbol.name);
        if !predicate.args.is_empty() {
            out.push('(');
            for (i, arg) in predicate.args.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                self.write_term(arg, out)?;
            }
            out.push(')');
        }
        Ok(())
    }

    pub fn format_literal(&mut self, literal: &Literal) -> Result<String> {
        let mut out = String::new();
        if !literal.polarity {
            out.push('¬');
        }
        self.write_predicate(&literal.predicate, &mut out)?;
        Ok(out)
    }

    pub fn format_clause(&mut self, clause: &CNFClause) -> Result<String> {
        if clause.is_empty() {
            return Ok("⊥".to_string());
        }
        let mut parts = Vec::with_capacity(clause.len());
        for literal in clause.literals() {
            parts.push(self.format_literal(literal)?);
        }
        Ok(parts.join(" ∨ "))
    }

    pub fn format_sentence(&mut self, sentence: &Sentence) -> Result<String> {
        let mut out = String::new();
        self.write_sentence(sentence, &mut out)?;
        Ok(out)
    }

    fn write_sentence(&mut self, sentence: &Sentence, out: &mut String) -> Result<()> {
        match sentence {
            Sentence::Predicate(p) => self.write_predicate(p, out)?,
            Sentence::Negation(inner) => {
                out.push('¬');
                self.write_bracketed(inner, out)?;
            }
            Sentence::Conjunction(l, r) => {
                self.write_bracketed(l, out)?;
                out.push_str(" ∧ ");
                self.write_bracketed(r, out)?;
            }
            Sentence::Disjunction(l, r) => {
                self.write_bracketed(l, out)?;
                out.push_str(" ∨ ");
                self.write_bracketed(r, out)?;
            }
            Sentence::Implication(l, r) => {
                self.write_bracketed(l, out)?;
                out.push_str(" ⇒ ");
                self.write_bracketed(r, out)?;
            }
            Sentence::Equivalence(l, r) => {
                self.write_bracketed(l, out)?;
                out.push_str(" ⇔ ");
                self.write_bracketed(r, out)?;
            }
            Sentence::UniversalQuantification(v, body) => {
                out.push('∀');
                self.write_term(&Term::Variable(v.clone()), out)?;
                out.push_str(". ");
                self.write_bracketed(body, out)?;
            }
            Sentence::ExistentialQuantification(v, body) => {
                out.push('∃');
                self.write_term(&Term::Variable(v.clone()), out)?;
                out.push_str(". ");
                self.write_bracketed(body, out)?;
            }
        }
        Ok(())
    }

    fn write_bracketed(&mut self, sentence: &Sentence, out: &mut String) -> Result<()> {
        match sentence {
            Sentence::Predicate(_) | Sentence::Negation(_) => self.write_sentence(sentence, out),
            _ => {
                out.push('(');
                self.write_sentence(sentence, out)?;
                out.push(')');
                Ok(())
            }
        }
    }

    pub fn format_substitution(&mut self, substitution: &VariableSubstitution) -> Result<String> {
        let mut entries = Vec::with_capacity(substitution.len());
        for (var, term) in substitution.iter() {
            let var_str = self.format_term(&Term::Variable(var.clone()))?;
            let term_str = self.format_term(term)?;
            entries.push(format!("{} ↦ {}", var_str, term_str));
        }
        entries.sort();
        Ok(format!("{{{}}}", entries.join(", ")))
    }

    /// Whether any labels have been bound so far.
    pub fn has_bindings(&self) -> bool {
        !self.standardised.is_empty() || !self.skolems.is_empty()
    }

    /// One line per bound label describing its provenance, in binding
    /// order.
    pub fn legend(&self) -> String {
        let mut lines = Vec::new();
        for (label, symbol) in self.standardised.values() {
            lines.push(format!(
                "{}: standardisation of '{}' in {}",
                label,
                symbol.original_name(),
                symbol.source()
            ));
        }
        for (label, symbol) in self.skolems.values() {
            let replaced = match &symbol.replaced().symbol {
                VariableSymbol::Standardised(sv) => self
                    .standardised
                    .get(&sv.id())
                    .map(|(l, _)| l.clone())
                    .unwrap_or_else(|| sv.to_string()),
                VariableSymbol::Named(name) => name.clone(),
            };
            lines.push(format!(
                "{}: Skolem function replacing '{}' in {}",
                label,
                replaced,
                symbol.source()
            ));
        }
        lines.join("\n")
    }
}
