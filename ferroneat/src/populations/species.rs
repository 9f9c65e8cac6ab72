use super::logging::Stats;
use crate::{Genome, GenomeKey};

use ahash::RandomState;
use log::{info, trace};
use serde::{Deserialize, Serialize};

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Species identifier. Assigned in order of creation,
/// starting at 1, and never reused.
pub type SpeciesKey = usize;

/// Species are collections of reproductively
/// compatible (within a certain [genetic distance])
/// genomes. Membership is determined by calculating
/// the genetic distance to a _representative_,
/// which is re-chosen every generation as the new
/// genome closest to the previous representative.
///
/// Species will stagnate after [`stagnation_threshold`]
/// generations without improving the species' fitness,
/// and may thereafter be removed during reproduction.
///
/// [genetic distance]: crate::PopulationConfig::distance_threshold
/// [`stagnation_threshold`]: crate::PopulationConfig::stagnation_threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species<G> {
    key: SpeciesKey,
    created: usize,
    pub(super) last_improved: usize,
    representative: G,
    pub(super) members: BTreeMap<GenomeKey, G>,
    pub(super) fitness: Option<f32>,
    pub(super) adjusted_fitness: Option<f32>,
    pub(super) fitness_history: Vec<f32>,
}

impl<G: Genome> Species<G> {
    /// Creates a new species with the specified key and
    /// representative, born in generation `created`.
    /// The species starts without members.
    pub(super) fn new(key: SpeciesKey, created: usize, representative: G) -> Species<G> {
        Species {
            key,
            created,
            last_improved: created,
            representative,
            members: BTreeMap::new(),
            fitness: None,
            adjusted_fitness: None,
            fitness_history: vec![],
        }
    }

    /// Replaces the species' representative and members.
    pub(super) fn update(&mut self, representative: G, members: BTreeMap<GenomeKey, G>) {
        self.representative = representative;
        self.members = members;
    }

    /// Returns the species' key.
    pub fn key(&self) -> SpeciesKey {
        self.key
    }

    /// Returns the generation in which the species was created.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Returns the last generation in which the species'
    /// fitness improved.
    pub fn last_improved(&self) -> usize {
        self.last_improved
    }

    /// Returns the species' representative.
    pub fn representative(&self) -> &G {
        &self.representative
    }

    /// Returns an iterator over the species' members,
    /// in ascending key order.
    pub fn members(&self) -> impl Iterator<Item = &G> {
        self.members.values()
    }

    /// Returns the member with the specified key, if any.
    pub fn member(&self, key: GenomeKey) -> Option<&G> {
        self.members.get(&key)
    }

    /// Returns the number of members in the species.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the species has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the species fitness computed during the
    /// last stagnation update, if any.
    pub fn fitness(&self) -> Option<f32> {
        self.fitness
    }

    /// Returns the species' fitness-shared fitness from the
    /// last reproduction, if any.
    pub fn adjusted_fitness(&self) -> Option<f32> {
        self.adjusted_fitness
    }

    /// Returns the species fitnesses of all past generations.
    pub fn fitness_history(&self) -> &[f32] {
        &self.fitness_history
    }

    /// Returns the fitnesses of all evaluated members.
    pub fn fitnesses(&self) -> Vec<f32> {
        self.members.values().filter_map(G::fitness).collect()
    }

    /// Returns the currently best-performing member,
    /// or `None` if no member has been evaluated.
    pub fn champion(&self) -> Option<&G> {
        self.members
            .values()
            .filter_map(|g| g.fitness().map(|f| (f, g)))
            .max_by(|(f1, _), (f2, _)| f1.total_cmp(f2))
            .map(|(_, g)| g)
    }

    /// Returns the genetic distance between the species'
    /// representative and `other`.
    pub fn genetic_distance<C>(&self, other: &G, config: &C) -> f32
    where
        G: Genome<Config = C>,
    {
        G::genetic_distance(&self.representative, other, config)
    }
}

/// A symmetric cache of genetic distances between genomes,
/// keyed by genome key.
pub struct GenomeDistanceCache<'a, C> {
    distances: HashMap<(GenomeKey, GenomeKey), f32, RandomState>,
    config: &'a C,
    hits: usize,
    misses: usize,
}

impl<'a, C> GenomeDistanceCache<'a, C> {
    pub fn new(config: &'a C) -> GenomeDistanceCache<'a, C> {
        GenomeDistanceCache {
            distances: HashMap::default(),
            config,
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the distance between the genomes, computing it
    /// only if neither ordering of the pair has been seen.
    ///
    /// # Examples
    /// ```
    /// use ferroneat::{Genome, GenomeDistanceCache};
    /// use ferroneat_nn::genomics::{GeneticConfig, InnovationTracker, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig::zero();
    /// let mut tracker = InnovationTracker::new(&config);
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let a = NNGenome::new(1, &config, &mut tracker, &mut rng);
    /// let b = NNGenome::new(2, &config, &mut tracker, &mut rng);
    ///
    /// let mut cache = GenomeDistanceCache::new(&config);
    /// let d = cache.distance(&a, &b);
    /// assert_eq!(cache.distance(&b, &a), d);
    /// assert_eq!((cache.hits(), cache.misses()), (1, 1));
    /// ```
    pub fn distance<G>(&mut self, first: &G, second: &G) -> f32
    where
        G: Genome<Config = C>,
    {
        let pair = if first.key() <= second.key() {
            (first.key(), second.key())
        } else {
            (second.key(), first.key())
        };
        if let Some(d) = self.distances.get(&pair) {
            self.hits += 1;
            return *d;
        }
        let d = G::genetic_distance(first, second, self.config);
        self.distances.insert(pair, d);
        self.misses += 1;
        d
    }

    /// Returns the number of lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of distances computed.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Returns an iterator over all computed distances.
    pub fn distances(&self) -> impl Iterator<Item = f32> + '_ {
        self.distances.values().copied()
    }
}

/// The set of all species in a population, which
/// owns every genome of the population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesSet<G> {
    species: BTreeMap<SpeciesKey, Species<G>>,
    genome_to_species: BTreeMap<GenomeKey, SpeciesKey>,
    next_species_key: SpeciesKey,
}

impl<G: Genome> SpeciesSet<G> {
    pub(crate) fn new() -> SpeciesSet<G> {
        SpeciesSet {
            species: BTreeMap::new(),
            genome_to_species: BTreeMap::new(),
            next_species_key: 1,
        }
    }

    /// Distributes the genomes among species.
    ///
    /// Each existing species first picks as its new representative
    /// the genome closest to its previous one, and is dropped if
    /// no genomes remain to choose from. Every other genome, in
    /// ascending key order, joins the first species (by key) whose
    /// representative is closer than `threshold`, or founds a new
    /// species.
    pub(crate) fn speciate<C>(
        &mut self,
        mut population: BTreeMap<GenomeKey, G>,
        generation: usize,
        threshold: f32,
        config: &C,
    ) where
        G: Genome<Config = C>,
    {
        let mut cache = GenomeDistanceCache::new(config);
        let mut unspeciated: BTreeSet<GenomeKey> = population.keys().copied().collect();
        let mut representatives: BTreeMap<SpeciesKey, GenomeKey> = BTreeMap::new();
        let mut memberships: BTreeMap<SpeciesKey, Vec<GenomeKey>> = BTreeMap::new();

        for (&species_key, species) in &self.species {
            let closest = unspeciated
                .iter()
                .map(|k| (cache.distance(species.representative(), &population[k]), *k))
                .min_by(|(d1, _), (d2, _)| d1.total_cmp(d2));
            if let Some((_, representative)) = closest {
                unspeciated.remove(&representative);
                representatives.insert(species_key, representative);
                memberships.insert(species_key, vec![representative]);
            }
        }

        for genome_key in unspeciated {
            let genome = &population[&genome_key];
            let compatible = representatives
                .iter()
                .find(|(_, r)| cache.distance(&population[*r], genome) < threshold)
                .map(|(s, _)| *s);
            match compatible {
                Some(species_key) => memberships
                    .get_mut(&species_key)
                    .unwrap_or_else(|| panic!("species {} has no member list", species_key))
                    .push(genome_key),
                None => {
                    let species_key = self.next_species_key;
                    self.next_species_key += 1;
                    representatives.insert(species_key, genome_key);
                    memberships.insert(species_key, vec![genome_key]);
                }
            }
        }

        let mut previous = std::mem::take(&mut self.species);
        self.genome_to_species.clear();
        for (species_key, member_keys) in memberships {
            let representative = population[&representatives[&species_key]].clone();
            let members: BTreeMap<GenomeKey, G> = member_keys
                .into_iter()
                .map(|k| {
                    self.genome_to_species.insert(k, species_key);
                    let genome = population
                        .remove(&k)
                        .unwrap_or_else(|| panic!("genome {} assigned to two species", k));
                    (k, genome)
                })
                .collect();
            let species = match previous.remove(&species_key) {
                Some(mut species) => {
                    species.update(representative, members);
                    species
                }
                None => {
                    let mut species = Species::new(species_key, generation, representative);
                    species.members = members;
                    species
                }
            };
            self.species.insert(species_key, species);
        }

        if let Some(stats) = Stats::from(cache.distances()) {
            info!(
                "Mean genetic distance {:.3}, standard deviation {:.3}",
                stats.mean, stats.stdev
            );
        }
        trace!(
            "Distance cache: {} hits, {} misses",
            cache.hits(),
            cache.misses()
        );
    }

    /// Returns an iterator over all species, in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = &Species<G>> {
        self.species.values()
    }

    /// Returns the species with the specified key, if any.
    pub fn get(&self, key: SpeciesKey) -> Option<&Species<G>> {
        self.species.get(&key)
    }

    /// Returns the key of the species the genome belongs to.
    pub fn species_of(&self, genome: GenomeKey) -> Option<SpeciesKey> {
        self.genome_to_species.get(&genome).copied()
    }

    /// Returns the number of species.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Returns `true` if there are no species.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Returns an iterator over every genome of every species.
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.species.values().flat_map(|s| s.members.values())
    }

    pub(crate) fn genomes_mut(&mut self) -> impl Iterator<Item = &mut G> {
        self.species.values_mut().flat_map(|s| s.members.values_mut())
    }

    pub(super) fn species_mut(&mut self) -> impl Iterator<Item = &mut Species<G>> {
        self.species.values_mut()
    }

    pub(super) fn get_mut(&mut self, key: SpeciesKey) -> Option<&mut Species<G>> {
        self.species.get_mut(&key)
    }

    pub(super) fn remove(&mut self, key: SpeciesKey) -> Option<Species<G>> {
        let species = self.species.remove(&key)?;
        for genome in species.members.keys() {
            self.genome_to_species.remove(genome);
        }
        Some(species)
    }

    pub(super) fn clear(&mut self) {
        self.species.clear();
        self.genome_to_species.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::testing::{config, trait_genome, TraitGenome};

    fn population(traits: &[(GenomeKey, f32)]) -> BTreeMap<GenomeKey, TraitGenome> {
        traits
            .iter()
            .map(|&(k, t)| (k, trait_genome(k, &[t, 0.0], None)))
            .collect()
    }

    #[test]
    fn every_genome_belongs_to_exactly_one_species() {
        let mut set = SpeciesSet::new();
        set.speciate(
            population(&[(1, 0.0), (2, 0.5), (3, 5.0), (4, 5.2), (5, 10.0)]),
            0,
            1.0,
            &config(),
        );

        assert_eq!(set.len(), 3);
        assert_eq!(set.genomes().count(), 5);
        let keys: BTreeSet<GenomeKey> = set.genomes().map(|g| g.key()).collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(set.species_of(1), set.species_of(2));
        assert_eq!(set.species_of(3), set.species_of(4));
        assert_ne!(set.species_of(1), set.species_of(3));
        assert_ne!(set.species_of(3), set.species_of(5));
    }

    #[test]
    fn genomes_join_the_first_compatible_species() {
        let mut set = SpeciesSet::new();
        set.speciate(population(&[(1, 0.0), (2, 2.0)]), 0, 1.5, &config());
        assert_eq!(set.species_of(1), Some(1));
        assert_eq!(set.species_of(2), Some(2));

        // Genome 5 is within range of both representatives,
        // and must join the species with the lowest key.
        set.speciate(population(&[(3, 0.0), (4, 2.0), (5, 1.0)]), 1, 1.5, &config());
        assert_eq!(set.species_of(3), Some(1));
        assert_eq!(set.species_of(4), Some(2));
        assert_eq!(set.species_of(5), Some(1));
    }

    #[test]
    fn species_keys_are_stable_while_representatives_rotate() {
        let mut set = SpeciesSet::new();
        set.speciate(population(&[(1, 0.0), (2, 10.0)]), 0, 1.0, &config());

        set.speciate(population(&[(3, 0.2), (4, 9.9), (5, 20.0)]), 1, 1.0, &config());
        assert_eq!(set.get(1).unwrap().representative().key(), 3);
        assert_eq!(set.get(2).unwrap().representative().key(), 4);
        assert_eq!(set.get(3).unwrap().created(), 1);
        assert_eq!(set.get(1).unwrap().created(), 0);
    }

    #[test]
    fn species_without_candidates_are_dropped() {
        let mut set = SpeciesSet::new();
        set.speciate(population(&[(1, 0.0), (2, 10.0), (3, 20.0)]), 0, 1.0, &config());
        assert_eq!(set.len(), 3);

        // Only two genomes remain: the third species gets nothing.
        set.speciate(population(&[(4, 0.0), (5, 10.0)]), 1, 1.0, &config());
        assert_eq!(set.len(), 2);
        assert!(set.get(3).is_none());
        assert!(set.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn new_species_keys_are_never_reused() {
        let mut set = SpeciesSet::new();
        set.speciate(population(&[(1, 0.0), (2, 10.0)]), 0, 1.0, &config());
        set.speciate(population(&[(3, 0.0)]), 1, 1.0, &config());
        set.speciate(population(&[(4, 0.0), (5, 10.0)]), 2, 1.0, &config());
        assert_eq!(set.species_of(5), Some(3));
    }

    #[test]
    fn distance_cache_is_symmetric() {
        let config = config();
        let a = trait_genome(1, &[0.0, 0.0], None);
        let b = trait_genome(2, &[1.0, 2.0], None);
        let mut cache = GenomeDistanceCache::new(&config);
        assert_eq!(cache.distance(&a, &b), 3.0);
        assert_eq!(cache.distance(&b, &a), 3.0);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn champion_is_fittest_member() {
        let mut set = SpeciesSet::new();
        let mut genomes = population(&[(1, 0.0), (2, 0.1), (3, 0.2)]);
        for (k, g) in genomes.iter_mut() {
            g.fitness = Some(*k as f32 * if *k == 2 { 10.0 } else { 1.0 });
        }
        set.speciate(genomes, 0, 1.0, &config());
        let species = set.get(1).unwrap();
        assert_eq!(species.champion().map(|g| g.key()), Some(2));
        assert_eq!(species.fitnesses().len(), 3);
    }
}
