use crate::engines::generation::{
    gene_consumer::CodonCursor,
    genome::Codon,
    grammar::{Grammar, NonTerminal, Symbol},
};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Wrap limit exceeded after {wraps} wraps")]
    WrapLimitExceeded { wraps: usize },

    #[error("Cannot decode an empty genotype")]
    EmptyGenotype,
}

impl DecodeError {
    /// Wraps performed before giving up, for the per-generation wrap log.
    pub fn wraps(&self) -> usize {
        match self {
            DecodeError::WrapLimitExceeded { wraps } => *wraps,
            DecodeError::EmptyGenotype => 0,
        }
    }
}

/// A fully terminal expression in `x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub expression: String,
    pub wraps: usize,
}

/// Codon positions that chose an operator, prefix function or literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalCodons {
    pub indexes: BTreeSet<usize>,
    pub wraps: usize,
}

/// Maps genotypes to phenotypes through leftmost derivation.
pub struct GrammarDecoder {
    grammar: Arc<Grammar>,
    max_wraps: usize,
}

impl GrammarDecoder {
    pub fn new(grammar: Arc<Grammar>, max_wraps: usize) -> Self {
        Self { grammar, max_wraps }
    }

    /// Main entry point: decode a genotype into a textual expression
    pub fn decode(&self, genotype: &[Codon]) -> Result<Decoded, DecodeError> {
        let (derivation, wraps) = self.derive(genotype, |_, _| {})?;

        let expression = derivation
            .iter()
            .filter_map(|symbol| match symbol {
                Symbol::Terminal(text) => Some(text.as_str()),
                Symbol::NonTerminal(_) => None,
            })
            .collect();

        Ok(Decoded { expression, wraps })
    }

    /// Run the same derivation as `decode`, recording the index of every codon
    /// consumed by a nonterminal other than the start symbol and `<var>`.
    pub fn terminal_codon_indexes(&self, genotype: &[Codon]) -> Result<TerminalCodons, DecodeError> {
        let start = self.grammar.start();
        let mut indexes = BTreeSet::new();

        let (_, wraps) = self.derive(genotype, |nt, index| {
            if nt != start && nt != NonTerminal::Var {
                indexes.insert(index);
            }
        })?;

        Ok(TerminalCodons { indexes, wraps })
    }

    /// Expand the leftmost nonterminal one codon at a time until none remain
    /// or the wrap limit is exceeded.
    fn derive<F>(&self, genotype: &[Codon], mut on_step: F) -> Result<(Vec<&Symbol>, usize), DecodeError>
    where
        F: FnMut(NonTerminal, usize),
    {
        if genotype.is_empty() {
            return Err(DecodeError::EmptyGenotype);
        }

        let mut derivation: Vec<&Symbol> = vec![self.grammar.start_symbol()];
        let mut cursor = CodonCursor::new(genotype);

        loop {
            let leftmost = derivation.iter().enumerate().find_map(|(i, symbol)| match symbol {
                Symbol::NonTerminal(nt) => Some((i, *nt)),
                Symbol::Terminal(_) => None,
            });

            let Some((position, nt)) = leftmost else {
                return Ok((derivation, cursor.wraps()));
            };

            let alternatives = self.grammar.alternatives(nt);
            let (index, choice) = cursor
                .choose(alternatives.len())
                .ok_or(DecodeError::EmptyGenotype)?;
            on_step(nt, index);

            derivation.splice(position..=position, alternatives[choice].iter());

            if cursor.wraps() > self.max_wraps {
                return Err(DecodeError::WrapLimitExceeded {
                    wraps: cursor.wraps(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(max_wraps: usize) -> GrammarDecoder {
        GrammarDecoder::new(Arc::new(Grammar::standard().unwrap()), max_wraps)
    }

    #[test]
    fn decodes_single_variable() {
        // expr -> <var> (3 % 4), var -> x (0 % 2)
        let decoded = decoder(5).decode(&[3, 0]).unwrap();
        assert_eq!(decoded.expression, "x");
        assert_eq!(decoded.wraps, 1);
    }

    #[test]
    fn decodes_nested_expression() {
        // expr -> <pre_op>(<expr>), pre_op -> exp, expr -> <var>, var -> x
        let decoded = decoder(5).decode(&[2, 2, 3, 0, 9]).unwrap();
        assert_eq!(decoded.expression, "exp(x)");
        assert_eq!(decoded.wraps, 0);
    }

    #[test]
    fn decodes_binary_expression_with_literal() {
        // expr -> <expr><op><expr>; expr -> <var> -> x; op -> *;
        // expr -> <var> -> <integer> -> 3.0
        let genotype = [0, 3, 0, 2, 3, 1, 2];
        let decoded = decoder(5).decode(&genotype).unwrap();
        assert_eq!(decoded.expression, "x*3.0");
    }

    #[test]
    fn all_zero_genotype_hits_wrap_limit() {
        let err = decoder(5).decode(&[0; 8]).unwrap_err();
        assert_eq!(err, DecodeError::WrapLimitExceeded { wraps: 6 });
        assert_eq!(err.wraps(), 6);
    }

    #[test]
    fn empty_genotype_fails() {
        assert_eq!(decoder(5).decode(&[]).unwrap_err(), DecodeError::EmptyGenotype);
        assert_eq!(
            decoder(5).terminal_codon_indexes(&[]).unwrap_err(),
            DecodeError::EmptyGenotype
        );
    }

    #[test]
    fn terminal_indexes_skip_expr_and_var_codons() {
        let genotype = [0, 3, 0, 2, 3, 1, 2];
        let terminals = decoder(5).terminal_codon_indexes(&genotype).unwrap();
        // index 3 chose the operator, index 6 chose the integer literal
        assert_eq!(terminals.indexes.into_iter().collect::<Vec<_>>(), vec![3, 6]);
    }

    #[test]
    fn terminal_indexes_fail_with_decode() {
        assert!(decoder(2).terminal_codon_indexes(&[0; 4]).is_err());
    }
}
