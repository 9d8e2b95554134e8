//! The knowledge base contract shared by the proving engines.

use crate::error::Result;
use crate::fol::Sentence;
use std::sync::Arc;

/// A store of asserted sentences that can be queried for entailment.
pub trait KnowledgeBase {
    type Query;

    /// Assert a sentence.
    fn tell(&mut self, sentence: &Arc<Sentence>) -> Result<()>;

    /// Assert several sentences.
    fn tell_many(&mut self, sentences: &[Arc<Sentence>]) -> Result<()> {
        for sentence in sentences {
            self.tell(sentence)?;
        }
        Ok(())
    }

    /// Begin a query for the given sentence.
    fn create_query(&self, query: &Arc<Sentence>) -> Result<Self::Query>;

    /// Convenience: run a query to completion and return its result.
    fn ask(&self, query: &Arc<Sentence>) -> Result<bool>;
}
