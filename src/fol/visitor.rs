//! Structural recursion over sentences and terms
//!
//! Two contracts per AST: a visitor that recurses for side effects, and a
//! transformation that produces a new tree. Transformations follow the
//! share-on-no-change rule: when every child of a node comes back as the
//! identical `Arc`, the original node is returned instead of a fresh
//! allocation, so unchanged sub-trees are shared by reference.

use super::sentence::{Predicate, Sentence};
use super::term::{Constant, FunctionSymbol, Term, Variable};
use std::sync::Arc;

/// Visitor over the sentence AST. Default methods recurse into children;
/// implementers override only the variants they care about.
pub trait SentenceVisitor {
    fn visit(&mut self, sentence: &Sentence) {
        match sentence {
            Sentence::Predicate(p) => self.visit_predicate(p),
            Sentence::Negation(inner) => self.visit_negation(inner),
            Sentence::Conjunction(l, r) => self.visit_conjunction(l, r),
            Sentence::Disjunction(l, r) => self.visit_disjunction(l, r),
            Sentence::Implication(l, r) => self.visit_implication(l, r),
            Sentence::Equivalence(l, r) => self.visit_equivalence(l, r),
            Sentence::UniversalQuantification(v, body) => self.visit_universal(v, body),
            Sentence::ExistentialQuantification(v, body) => self.visit_existential(v, body),
        }
    }

    fn visit_predicate(&mut self, _predicate: &Predicate) {}

    fn visit_negation(&mut self, inner: &Sentence) {
        self.visit(inner);
    }

    fn visit_conjunction(&mut self, left: &Sentence, right: &Sentence) {
        self.visit(left);
        self.visit(right);
    }

    fn visit_disjunction(&mut self, left: &Sentence, right: &Sentence) {
        self.visit(left);
        self.visit(right);
    }

    fn visit_implication(&mut self, antecedent: &Sentence, consequent: &Sentence) {
        self.visit(antecedent);
        self.visit(consequent);
    }

    fn visit_equivalence(&mut self, left: &Sentence, right: &Sentence) {
        self.visit(left);
        self.visit(right);
    }

    fn visit_universal(&mut self, _variable: &Variable, body: &Sentence) {
        self.visit(body);
    }

    fn visit_existential(&mut self, _variable: &Variable, body: &Sentence) {
        self.visit(body);
    }
}

/// Transformation over the sentence AST producing a fresh tree.
///
/// The default methods rebuild a node only when a child actually changed
/// (detected with `Arc::ptr_eq`), returning the original `Arc` otherwise.
pub trait SentenceTransformation {
    fn apply(&mut self, sentence: &Arc<Sentence>) -> Arc<Sentence> {
        match sentence.as_ref() {
            Sentence::Predicate(p) => self.transform_predicate(sentence, p),
            Sentence::Negation(inner) => self.transform_negation(sentence, inner),
            Sentence::Conjunction(l, r) => self.transform_conjunction(sentence, l, r),
            Sentence::Disjunction(l, r) => self.transform_disjunction(sentence, l, r),
            Sentence::Implication(l, r) => self.transform_implication(sentence, l, r),
            Sentence::Equivalence(l, r) => self.transform_equivalence(sentence, l, r),
            Sentence::UniversalQuantification(v, body) => {
                self.transform_universal(sentence, v, body)
            }
            Sentence::ExistentialQuantification(v, body) => {
                self.transform_existential(sentence, v, body)
            }
        }
    }

    /// Transform a term appearing in a predicate argument. Identity by
    /// default.
    fn transform_term(&mut self, term: &Term) -> Term {
        term.clone()
    }

    fn transform_predicate(
        &mut self,
        original: &Arc<Sentence>,
        predicate: &Predicate,
    ) -> Arc<Sentence> {
        let args: Vec<Term> = predicate.args.iter().map(|t| self.transform_term(t)).collect();
        if args == predicate.args {
            Arc::clone(original)
        } else {
            Arc::new(Sentence::Predicate(Predicate {
                symbol: predicate.symbol.clone(),
                args,
            }))
        }
    }

    fn transform_negation(
        &mut self,
        original: &Arc<Sentence>,
        inner: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let new_inner = self.apply(inner);
        if Arc::ptr_eq(&new_inner, inner) {
            Arc::clone(original)
        } else {
            Arc::new(Sentence::Negation(new_inner))
        }
    }

    fn transform_conjunction(
        &mut self,
        original: &Arc<Sentence>,
        left: &Arc<Sentence>,
        right: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let (l, r) = (self.apply(left), self.apply(right));
        if Arc::ptr_eq(&l, left) && Arc::ptr_eq(&r, right) {
            Arc::clone(original)
        } else {
            Arc::new(Sentence::Conjunction(l, r))
        }
    }

    fn transform_disjunction(
        &mut self,
        original: &Arc<Sentence>,
        left: &Arc<Sentence>,
        right: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let (l, r) = (self.apply(left), self.apply(right));
        if Arc::ptr_eq(&l, left) && Arc::ptr_eq(&r, right) {
            Arc::clone(original)
        } else {
            Arc::new(Sentence::Disjunction(l, r))
        }
    }

    fn transform_implication(
        &mut self,
        original: &Arc<Sentence>,
        antecedent: &Arc<Sentence>,
        consequent: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let (a, c) = (self.apply(antecedent), self.apply(consequent));
        if Arc::ptr_eq(&a, antecedent) && Arc::ptr_eq(&c, consequent) {
            Arc::clone(original)
        } else {
            Arc::new(Sentence::Implication(a, c))
        }
    }

    fn transform_equivalence(
        &mut self,
        original: &Arc<Sentence>,
        left: &Arc<Sentence>,
        right: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let (l, r) = (self.apply(left), self.apply(right));
        if Arc::ptr_eq(&l, left) && Arc::ptr_eq(&r, right) {
            Arc::clone(original)
        } else {
            Arc::new(Sentence::Equivalence(l, r))
        }
    }

    fn transform_universal(
        &mut self,
        original: &Arc<Sentence>,
        variable: &Variable,
        body: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let new_body = self.apply(body);
        if Arc::ptr_eq(&new_body, body) {
            Arc::clone(original)
        } else {
            Arc::new(Sentence::UniversalQuantification(variable.clone(), new_body))
        }
    }

    fn transform_existential(
        &mut self,
        original: &Arc<Sentence>,
        variable: &Variable,
        body: &Arc<Sentence>,
    ) -> Arc<Sentence> {
        let new_body = self.apply(body);
        if Arc::ptr_eq(&new_body, body) {
            Arc::clone(original)
        } else {
            Arc::new(Sentence::ExistentialQuantification(
                variable.clone(),
                new_body,
            ))
        }
    }
}

/// Transformation over the term AST.
pub trait TermTransformation {
    fn apply(&mut self, term: &Term) -> Term {
        match term {
            Term::Variable(v) => self.transform_variable(v),
            Term::Constant(c) => self.transform_constant(c),
            Term::Function(symbol, args) => self.transform_function(symbol, args),
        }
    }

    fn transform_variable(&mut self, variable: &Variable) -> Term {
        Term::Variable(variable.clone())
    }

    fn transform_constant(&mut self, constant: &Constant) -> Term {
        Term::Constant(constant.clone())
    }

    fn transform_function(&mut self, symbol: &FunctionSymbol, args: &[Term]) -> Term {
        let new_args: Vec<Term> = args.iter().map(|a| self.apply(a)).collect();
        Term::Function(symbol.clone(), new_args)
    }
}
