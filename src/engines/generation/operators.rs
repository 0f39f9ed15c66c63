use crate::engines::generation::genome::{Codon, Genotype, CODON_RANGE};
use crate::types::Individual;
use rand::Rng;

/// Mutation probability annealed from `pm_0` towards the floor `pm_inf`:
/// `pm_inf + (pm_0 - pm_inf) / 2^(0.2 g)`.
pub fn mutation_probability(generation: usize, pm_0: f64, pm_inf: f64) -> f64 {
    pm_inf + (pm_0 - pm_inf) / 2f64.powf(0.2 * generation as f64)
}

/// Tournament size annealed from `initial` towards `final_size`, truncated
/// to an integer and never below 1.
pub fn tournament_size(generation: usize, initial: usize, final_size: usize) -> usize {
    let initial = initial as f64;
    let final_size = final_size as f64;
    let size = final_size + (initial - final_size) / 2f64.powf(0.5 * generation as f64);
    (size as usize).max(1)
}

/// Generate a random genotype with length in `[min_len, max_len)`
pub fn random_genotype<R: Rng>(min_len: usize, max_len: usize, rng: &mut R) -> Genotype {
    let length = if min_len < max_len {
        rng.gen_range(min_len..max_len)
    } else {
        min_len
    };
    (0..length).map(|_| rng.gen_range(CODON_RANGE)).collect()
}

/// Tournament selection with replacement: `count` winners, each the lowest
/// fitness among `tournament_size` random draws.
pub fn tournament_selection<R: Rng>(
    population: &[Individual],
    count: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Individual> {
    if population.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|_| {
            let mut best_idx = rng.gen_range(0..population.len());
            let mut best_fitness = population[best_idx].fitness.value;

            for _ in 1..tournament_size {
                let idx = rng.gen_range(0..population.len());
                if population[idx].fitness.value < best_fitness {
                    best_idx = idx;
                    best_fitness = population[idx].fitness.value;
                }
            }

            population[best_idx].clone()
        })
        .collect()
}

/// Variable-length one-point crossover at fixed cut points:
/// `child1 = p1[..point1] ++ p2[point2..]`, `child2 = p1[point1..] ++ p2[..point2]`.
pub fn crossover_at(
    parent1: &[Codon],
    parent2: &[Codon],
    point1: usize,
    point2: usize,
) -> (Genotype, Genotype) {
    let point1 = point1.min(parent1.len());
    let point2 = point2.min(parent2.len());

    let mut child1 = Vec::with_capacity(point1 + parent2.len() - point2);
    child1.extend_from_slice(&parent1[..point1]);
    child1.extend_from_slice(&parent2[point2..]);

    let mut child2 = Vec::with_capacity(parent1.len() - point1 + point2);
    child2.extend_from_slice(&parent1[point1..]);
    child2.extend_from_slice(&parent2[..point2]);

    (child1, child2)
}

/// Crossover with an independent cut point in each parent, drawn from
/// `[0, len - 1)`. Parents shorter than two codons are cloned.
pub fn crossover<R: Rng>(parent1: &[Codon], parent2: &[Codon], rng: &mut R) -> (Genotype, Genotype) {
    if parent1.len() < 2 || parent2.len() < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let point1 = rng.gen_range(0..parent1.len() - 1);
    let point2 = rng.gen_range(0..parent2.len() - 1);
    crossover_at(parent1, parent2, point1, point2)
}

/// Mate disjoint consecutive pairs of parents. Each pair is crossed with
/// probability `mating_probability`, otherwise cloned. A trailing unpaired
/// parent is dropped.
pub fn mate<R: Rng>(parents: &[Individual], mating_probability: f64, rng: &mut R) -> Vec<Genotype> {
    let mut offspring = Vec::with_capacity(parents.len());

    for pair in parents.chunks_exact(2) {
        let (parent1, parent2) = (&pair[0].genotype, &pair[1].genotype);

        if rng.gen::<f64>() < mating_probability {
            let (child1, child2) = crossover(parent1, parent2, rng);
            offspring.push(child1);
            offspring.push(child2);
        } else {
            offspring.push(parent1.clone());
            offspring.push(parent2.clone());
        }
    }

    offspring
}

/// Mutation: replace each codon with a fresh one with probability `mutation_prob`
pub fn mutate<R: Rng>(genotype: &mut Genotype, mutation_prob: f64, rng: &mut R) {
    for codon in genotype.iter_mut() {
        if rng.gen::<f64>() < mutation_prob {
            *codon = rng.gen_range(CODON_RANGE);
        }
    }
}

/// Duplication: with probability `duplication_probability`, append a slice
/// of the genotype to its own tail.
///
/// The slice length is drawn from `[min_len, max(len, max_len))`; the upper
/// bound deliberately uses `max`, so long genotypes may copy more than
/// `max_len` codons. The slice is clipped at the current end.
pub fn duplicate<R: Rng>(
    genotype: &Genotype,
    duplication_probability: f64,
    min_len: usize,
    max_len: usize,
    rng: &mut R,
) -> Genotype {
    if genotype.is_empty() || rng.gen::<f64>() >= duplication_probability {
        return genotype.clone();
    }

    let upper = genotype.len().max(max_len);
    let count = if min_len < upper {
        rng.gen_range(min_len..upper)
    } else {
        min_len
    };
    let start = if genotype.len() > 1 {
        rng.gen_range(0..genotype.len() - 1)
    } else {
        0
    };
    let end = (start + count).min(genotype.len());

    let mut duplicated = genotype.clone();
    duplicated.extend_from_slice(&genotype[start..end]);
    duplicated
}
