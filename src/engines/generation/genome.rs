/// Genotype representation for grammatical evolution
///
/// A genotype is a variable-length sequence of codons. Each codon is consumed
/// by the `GrammarDecoder` to pick a production for the leftmost nonterminal:
/// the chosen alternative is `codon % alternatives.len()`.
///
/// # Why `u32` codons?
///
/// Fresh codons (initialization and mutation) are always drawn from
/// `CODON_RANGE`, i.e. they are byte-valued. Local search, however, probes
/// neighbours by adding 1..=3 to a codon without wrapping, so a codon may
/// legitimately sit slightly above 255. Since only `codon % n` is ever read,
/// the wider type keeps those neighbours distinct from a wrapped byte.
///
/// Length is unbounded; an oversized genotype is penalised by the fitness
/// evaluator rather than truncated.
pub type Codon = u32;

pub type Genotype = Vec<Codon>;

/// Range fresh codons are drawn from.
pub const CODON_RANGE: std::ops::RangeInclusive<Codon> = 0..=255;
