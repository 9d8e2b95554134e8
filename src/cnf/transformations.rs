//! The individual sentence transformations composed by [`super::to_cnf`]
//!
//! Each transformation is a [`SentenceTransformation`]; unchanged sub-trees
//! are shared by reference through the default share-on-no-change walk.

use crate::fol::visitor::SentenceTransformation;
use crate::fol::{
    FunctionSymbol, Sentence, SkolemFunction, StandardisedVariable, Term, Variable,
    VariableSymbol,
};
use std::collections::HashMap;
use std::sync::Arc;

/// `A ⇔ B ↦ (A ⇒ B) ∧ (B ⇒ A)`
pub struct EquivalenceElimination;

impl SentenceTransformation for EquivalenceElimination {
    fn transform_equivalence(
        &mut self,
        _original: &Arc<Sentence>,
        left: &Arc<Sentence>,
        right: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let l = self.apply(left);
        let r = self.apply(right);
        Sentence::and(
            Sentence::implies(Arc::clone(&l), Arc::clone(&r)),
            Sentence::implies(r, l),
        )
    }
}

/// `A ⇒ B ↦ ¬A ∨ B`
pub struct ImplicationElimination;

impl SentenceTransformation for ImplicationElimination {
    fn transform_implication(
        &mut self,
        _original: &Arc<Sentence>,
        antecedent: &Arc<Sentence>,
        consequent: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        Sentence::or(
            Sentence::not(self.apply(antecedent)),
            self.apply(consequent),
        )
    }
}

/// Drive negations inward to negation normal form: De Morgan, double
/// negation elimination, and the quantifier duals.
pub struct NegationNormalisation;

impl SentenceTransformation for NegationNormalisation {
    fn transform_negation(
        &mut self,
        original: &Arc<Sentence>,
        inner: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        match inner.as_ref() {
            Sentence::Predicate(_) => Arc::clone(original),

            // ¬¬A ↦ A
            Sentence::Negation(inner2) => self.apply(inner2),

            // De Morgan
            Sentence::Conjunction(l, r) => Sentence::or(
                self.apply(&Sentence::not(Arc::clone(l))),
                self.apply(&Sentence::not(Arc::clone(r))),
            ),
            Sentence::Disjunction(l, r) => Sentence::and(
                self.apply(&Sentence::not(Arc::clone(l))),
                self.apply(&Sentence::not(Arc::clone(r))),
            ),

            // ¬(A ⇒ B) ↦ A ∧ ¬B
            Sentence::Implication(a, c) => Sentence::and(
                self.apply(a),
                self.apply(&Sentence::not(Arc::clone(c))),
            ),

            // ¬(A ⇔ B) ↦ (A ∧ ¬B) ∨ (¬A ∧ B)
            Sentence::Equivalence(l, r) => Sentence::or(
                Sentence::and(
                    self.apply(l),
                    self.apply(&Sentence::not(Arc::clone(r))),
                ),
                Sentence::and(
                    self.apply(&Sentence::not(Arc::clone(l))),
                    self.apply(r),
                ),
            ),

            // Quantifier duals
            Sentence::UniversalQuantification(var, body) => Sentence::exists(
                var.clone(),
                self.apply(&Sentence::not(Arc::clone(body))),
            ),
            Sentence::ExistentialQuantification(var, body) => Sentence::forall(
                var.clone(),
                self.apply(&Sentence::not(Arc::clone(body))),
            ),
        }
    }
}

/// Rename every quantified variable to a fresh [`StandardisedVariable`].
///
/// Distinct quantifiers get distinct symbols even when they bound the same
/// original name. The symbols carry the whole input sentence for
/// explanation purposes.
pub struct VariableStandardisation {
    original: Arc<Sentence>,
    scopes: HashMap<Variable, Vec<Variable>>,
}

impl VariableStandardisation {
    pub fn new(original: Arc<Sentence>) -> Self {
        VariableStandardisation {
            original,
            scopes: HashMap::new(),
        }
    }

    fn fresh_for(&self, var: &Variable) -> Variable {
        let original_name = match &var.symbol {
            VariableSymbol::Named(name) => name.clone(),
            VariableSymbol::Standardised(sv) => sv.original_name().to_string(),
        };
        Variable::standardised(StandardisedVariable::new(
            original_name,
            Arc::clone(&self.original),
        ))
    }

    fn rename(&self, term: &Term) -> Term {
        match term {
            Term::Variable(v) => match self.scopes.get(v).and_then(|stack| stack.last()) {
                Some(renamed) => Term::Variable(renamed.clone()),
                None => term.clone(),
            },
            Term::Constant(_) => term.clone(),
            Term::Function(symbol, args) => Term::Function(
                symbol.clone(),
                args.iter().map(|arg| self.rename(arg)).collect(),
            ),
        }
    }
}

impl SentenceTransformation for VariableStandardisation {
    fn transform_term(&mut self, term: &Term) -> Term {
        self.rename(term)
    }

    fn transform_universal(
        &mut self,
        _original: &Arc<Sentence>,
        variable: &Variable,
        body: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let fresh = self.fresh_for(variable);
        self.scopes
            .entry(variable.clone())
            .or_default()
            .push(fresh.clone());
        let new_body = self.apply(body);
        self.scopes.get_mut(variable).unwrap().pop();
        Sentence::forall(fresh, new_body)
    }

    fn transform_existential(
        &mut self,
        _original: &Arc<Sentence>,
        variable: &Variable,
        body: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let fresh = self.fresh_for(variable);
        self.scopes
            .entry(variable.clone())
            .or_default()
            .push(fresh.clone());
        let new_body = self.apply(body);
        self.scopes.get_mut(variable).unwrap().pop();
        Sentence::exists(fresh, new_body)
    }
}

/// Replace existentially-quantified variables with Skolem terms over the
/// universal variables in scope, dropping the existential quantifier.
pub struct Skolemisation {
    original: Arc<Sentence>,
    universal_scope: Vec<Variable>,
    replacements: HashMap<Variable, Term>,
}

impl Skolemisation {
    pub fn new(original: Arc<Sentence>) -> Self {
        Skolemisation {
            original,
            universal_scope: Vec::new(),
            replacements: HashMap::new(),
        }
    }

    fn replace(&self, term: &Term) -> Term {
        match term {
            Term::Variable(v) => match self.replacements.get(v) {
                Some(skolem_term) => skolem_term.clone(),
                None => term.clone(),
            },
            Term::Constant(_) => term.clone(),
            Term::Function(symbol, args) => Term::Function(
                symbol.clone(),
                args.iter().map(|arg| self.replace(arg)).collect(),
            ),
        }
    }
}

impl SentenceTransformation for Skolemisation {
    fn transform_term(&mut self, term: &Term) -> Term {
        self.replace(term)
    }

    fn transform_universal(
        &mut self,
        original: &Arc<Sentence>,
        variable: &Variable,
        body: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        self.universal_scope.push(variable.clone());
        let new_body = self.apply(body);
        self.universal_scope.pop();
        if Arc::ptr_eq(&new_body, body) {
            Arc::clone(original)
        } else {
            Sentence::forall(variable.clone(), new_body)
        }
    }

    fn transform_existential(
        &mut self,
        _original: &Arc<Sentence>,
        variable: &Variable,
        body: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let symbol = SkolemFunction::new(variable.clone(), Arc::clone(&self.original));
        let skolem_term = Term::Function(
            FunctionSymbol::skolem(symbol, self.universal_scope.len()),
            self.universal_scope
                .iter()
                .map(|v| Term::Variable(v.clone()))
                .collect(),
        );

        self.replacements.insert(variable.clone(), skolem_term);
        let result = self.apply(body);
        self.replacements.remove(variable);
        result
    }
}

/// Remove universal quantifiers; all remaining variables are implicitly
/// universally quantified.
pub struct UniversalQuantifierElimination;

impl SentenceTransformation for UniversalQuantifierElimination {
    fn transform_universal(
        &mut self,
        _original: &Arc<Sentence>,
        _variable: &Variable,
        body: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        self.apply(body)
    }
}

/// Distribute ∨ over ∧ to fixed point:
/// `A ∨ (B ∧ C) ↦ (A ∨ B) ∧ (A ∨ C)` and its mirror.
pub struct DisjunctionDistribution;

impl SentenceTransformation for DisjunctionDistribution {
    fn transform_disjunction(
        &mut self,
        original: &Arc<Sentence>,
        left: &Arc<Sentence>,
        right: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let l = self.apply(left);
        let r = self.apply(right);

        if let Sentence::Conjunction(a, b) = l.as_ref() {
            return Sentence::and(
                self.apply(&Sentence::or(Arc::clone(a), Arc::clone(&r))),
                self.apply(&Sentence::or(Arc::clone(b), r)),
            );
        }
        if let Sentence::Conjunction(a, b) = r.as_ref() {
            return Sentence::and(
                self.apply(&Sentence::or(Arc::clone(&l), Arc::clone(a))),
                self.apply(&Sentence::or(l, Arc::clone(b))),
            );
        }

        if Arc::ptr_eq(&l, left) && Arc::ptr_eq(&r, right) {
            Arc::clone(original)
        } else {
            Sentence::or(l, r)
        }
    }
}
