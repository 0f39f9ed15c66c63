use super::genome::Codon;

/// Consumes codons from a genotype, wrapping around to the start and
/// counting every full pass.
pub struct CodonCursor<'a> {
    genotype: &'a [Codon],
    position: usize,
    wraps: usize,
}

impl<'a> CodonCursor<'a> {
    pub fn new(genotype: &'a [Codon]) -> Self {
        Self {
            genotype,
            position: 0,
            wraps: 0,
        }
    }

    /// Consume the codon under the cursor, returning it with its index.
    ///
    /// Returns `None` only for an empty genotype.
    pub fn consume(&mut self) -> Option<(usize, Codon)> {
        let codon = *self.genotype.get(self.position)?;
        let index = self.position;

        self.position += 1;
        if self.position >= self.genotype.len() {
            self.position = 0;
            self.wraps += 1;
        }

        Some((index, codon))
    }

    /// Consume a codon and map it to a choice index
    pub fn choose(&mut self, num_choices: usize) -> Option<(usize, usize)> {
        let (index, codon) = self.consume()?;
        if num_choices == 0 {
            return Some((index, 0));
        }
        Some((index, codon as usize % num_choices))
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn wraps(&self) -> usize {
        self.wraps
    }
}
