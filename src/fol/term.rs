//! Terms in first-order logic

use super::sentence::Sentence;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(0);

/// Mint a process-unique identifier for a normalisation symbol.
pub(crate) fn next_symbol_id() -> u64 {
    NEXT_SYMBOL_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

/// A variable symbol minted by standardisation-apart.
///
/// Carries the original variable name and the sentence it was standardised
/// from, so that explanations can describe its provenance. Identity is the
/// unique `id` alone; the back-pointer is never traversed for equality or
/// hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardisedVariable {
    id: u64,
    original: String,
    source: Arc<Sentence>,
}

impl StandardisedVariable {
    pub fn new(original: impl Into<String>, source: Arc<Sentence>) -> Self {
        StandardisedVariable {
            id: next_symbol_id(),
            original: original.into(),
            source,
        }
    }

    /// The same standardisation with a fresh identity, for renaming a
    /// clause or rule apart before unification.
    pub fn refreshed(&self) -> Self {
        StandardisedVariable {
            id: next_symbol_id(),
            original: self.original.clone(),
            source: Arc::clone(&self.source),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The name of the variable this symbol was standardised from.
    pub fn original_name(&self) -> &str {
        &self.original
    }

    /// The sentence this symbol was standardised from.
    pub fn source(&self) -> &Arc<Sentence> {
        &self.source
    }
}

impl PartialEq for StandardisedVariable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StandardisedVariable {}

impl Hash for StandardisedVariable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for StandardisedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.original, self.id)
    }
}

/// A function symbol minted by Skolemisation.
///
/// Records the standardised variable it replaced and the sentence it arose
/// from. As with [`StandardisedVariable`], identity is the `id` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkolemFunction {
    id: u64,
    replaced: Variable,
    source: Arc<Sentence>,
}

impl SkolemFunction {
    pub fn new(replaced: Variable, source: Arc<Sentence>) -> Self {
        SkolemFunction {
            id: next_symbol_id(),
            replaced,
            source,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The existentially-quantified variable this symbol replaced.
    pub fn replaced(&self) -> &Variable {
        &self.replaced
    }

    /// The sentence this symbol arose from.
    pub fn source(&self) -> &Arc<Sentence> {
        &self.source
    }
}

impl PartialEq for SkolemFunction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SkolemFunction {}

impl Hash for SkolemFunction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for SkolemFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sk{}", self.id)
    }
}

/// The symbol of a variable: user-declared or standardised apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableSymbol {
    Named(String),
    Standardised(StandardisedVariable),
}

/// A variable declaration in first-order logic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub symbol: VariableSymbol,
}

impl Variable {
    pub fn named(name: impl Into<String>) -> Self {
        Variable {
            symbol: VariableSymbol::Named(name.into()),
        }
    }

    pub fn standardised(symbol: StandardisedVariable) -> Self {
        Variable {
            symbol: VariableSymbol::Standardised(symbol),
        }
    }

    pub fn is_standardised(&self) -> bool {
        matches!(self.symbol, VariableSymbol::Standardised(_))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            VariableSymbol::Named(name) => write!(f, "{}", name),
            VariableSymbol::Standardised(sv) => write!(f, "{}", sv),
        }
    }
}

/// A constant symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constant {
    pub name: String,
}

impl Constant {
    pub fn new(name: impl Into<String>) -> Self {
        Constant { name: name.into() }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The name of a function symbol: user-declared or a Skolem function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionName {
    Named(String),
    Skolem(SkolemFunction),
}

/// A function symbol with arity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSymbol {
    pub name: FunctionName,
    pub arity: usize,
}

impl FunctionSymbol {
    pub fn named(name: impl Into<String>, arity: usize) -> Self {
        FunctionSymbol {
            name: FunctionName::Named(name.into()),
            arity,
        }
    }

    pub fn skolem(symbol: SkolemFunction, arity: usize) -> Self {
        FunctionSymbol {
            name: FunctionName::Skolem(symbol),
            arity,
        }
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            FunctionName::Named(name) => write!(f, "{}", name),
            FunctionName::Skolem(sk) => write!(f, "{}", sk),
        }
    }
}

/// A term in first-order logic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Variable(Variable),
    Constant(Constant),
    Function(FunctionSymbol, Vec<Term>),
}

impl Term {
    pub fn variable(name: impl Into<String>) -> Term {
        Term::Variable(Variable::named(name))
    }

    pub fn constant(name: impl Into<String>) -> Term {
        Term::Constant(Constant::new(name))
    }

    pub fn function(name: impl Into<String>, args: Vec<Term>) -> Term {
        let arity = args.len();
        Term::Function(FunctionSymbol::named(name, arity), args)
    }

    /// A term is ground when it contains no variables.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(_) => true,
            Term::Function(_, args) => args.iter().all(Term::is_ground),
        }
    }

    /// Get all variables in this term
    pub fn variables(&self) -> Vec<Variable> {
        match self {
            Term::Variable(v) => vec![v.clone()],
            Term::Constant(_) => vec![],
            Term::Function(_, args) => args.iter().flat_map(|arg| arg.variables()).collect(),
        }
    }

    /// Collect all variables in this term
    pub fn collect_variables(&self, vars: &mut HashSet<Variable>) {
        match self {
            Term::Variable(v) => {
                vars.insert(v.clone());
            }
            Term::Constant(_) => {}
            Term::Function(_, args) => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{}", v),
            Term::Constant(c) => write!(f, "{}", c),
            Term::Function(func, args) => {
                write!(f, "{}", func)?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}
