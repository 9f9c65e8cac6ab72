use ferroneat::{Genome, GenomeKey, Population, PopulationConfig, Snapshot};
use ferroneat_nn::{
    genomics::{
        ActivationType, AggregationType, BoolAttribute, ChoiceAttribute, FloatAttribute,
        GeneticConfig, InitialConnection, InnovationTracker, NNGenome,
    },
    networks::FeedForwardNetwork,
};

use std::num::NonZeroUsize;

const XOR: [([f32; 2], f32); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

fn evaluate_xor(genomes: &mut [(GenomeKey, &mut NNGenome)], config: &GeneticConfig) {
    for (_, genome) in genomes.iter_mut() {
        let mut network = FeedForwardNetwork::create(genome, config);
        let mut fitness = 4.0;
        for (input, expected) in XOR {
            let output = network.activate(&input).unwrap()[0];
            fitness -= (output - expected).powi(2);
        }
        genome.set_fitness(fitness);
    }
}

fn genetic_config() -> GeneticConfig {
    GeneticConfig {
        input_count: NonZeroUsize::new(2).unwrap(),
        output_count: NonZeroUsize::new(1).unwrap(),
        feed_forward: true,
        initial_connection: InitialConnection::FullDirect,
        disjoint_gene_factor: 1.0,
        common_gene_factor: 0.5,
        connection_addition_chance: 0.5,
        connection_deletion_chance: 0.5,
        node_addition_chance: 0.2,
        node_deletion_chance: 0.2,
        bias: FloatAttribute {
            mutate_rate: 0.7,
            mutate_power: 0.5,
            replace_rate: 0.1,
            ..FloatAttribute::gaussian(0.0, 1.0, 30.0)
        },
        response: FloatAttribute::constant(1.0),
        weight: FloatAttribute {
            mutate_rate: 0.8,
            mutate_power: 0.5,
            replace_rate: 0.1,
            ..FloatAttribute::gaussian(0.0, 1.0, 30.0)
        },
        enabled: BoolAttribute {
            mutate_rate: 0.01,
            ..BoolAttribute::fixed(true)
        },
        activation: ChoiceAttribute::fixed(ActivationType::Sigmoid),
        aggregation: ChoiceAttribute::fixed(AggregationType::Sum),
        ..GeneticConfig::zero()
    }
}

fn population_config(seed: u64) -> PopulationConfig {
    PopulationConfig {
        size: NonZeroUsize::new(150).unwrap(),
        fitness_threshold: 3.9,
        reset_on_extinction: true,
        distance_threshold: 3.0,
        elitism: 2,
        survival_threshold: 0.2,
        min_species_size: NonZeroUsize::new(2).unwrap(),
        sexual_reproduction_chance: 1.0,
        stagnation_threshold: NonZeroUsize::new(20).unwrap(),
        species_elitism: 2,
        seed: Some(seed),
        ..PopulationConfig::zero()
    }
}

type XorPopulation = Population<GeneticConfig, InnovationTracker, NNGenome>;

/// Renders every genome of the population, in key order.
fn describe(population: &XorPopulation) -> Vec<String> {
    let mut genomes: Vec<&NNGenome> = population.genomes().collect();
    genomes.sort_unstable_by_key(|g| g.key());
    genomes.into_iter().map(|g| g.to_string()).collect()
}

#[test]
fn xor_is_solved() {
    let solved = [1, 2, 3].into_iter().any(|seed| {
        let mut population = XorPopulation::new(population_config(seed), genetic_config()).unwrap();
        let best = population.run(evaluate_xor, Some(300)).unwrap().unwrap();
        best.fitness().unwrap() >= 3.9
    });
    assert!(solved);
}

#[test]
fn solution_network_computes_xor() {
    for seed in [1, 2, 3] {
        let config = genetic_config();
        let mut population = XorPopulation::new(population_config(seed), config.clone()).unwrap();
        let best = population.run(evaluate_xor, Some(300)).unwrap().unwrap();
        if best.fitness().unwrap() < 3.9 {
            continue;
        }
        let mut network = FeedForwardNetwork::create(&best, &config);
        for (input, expected) in XOR {
            let output = network.activate(&input).unwrap()[0];
            assert!((output - expected).abs() < 0.5);
        }
        return;
    }
    panic!("no seed solved XOR");
}

#[test]
fn seeded_runs_are_reproducible() {
    let mut first = XorPopulation::new(population_config(7), genetic_config()).unwrap();
    let mut second = XorPopulation::new(population_config(7), genetic_config()).unwrap();
    first.run(evaluate_xor, Some(10)).unwrap();
    second.run(evaluate_xor, Some(10)).unwrap();

    assert_eq!(first.generation(), second.generation());
    assert_eq!(describe(&first), describe(&second));
    assert_eq!(
        first.species().iter().map(|s| s.key()).collect::<Vec<_>>(),
        second.species().iter().map(|s| s.key()).collect::<Vec<_>>(),
    );
}

#[test]
fn restored_snapshot_continues_identically() {
    let mut uninterrupted = XorPopulation::new(population_config(11), genetic_config()).unwrap();
    uninterrupted.run(evaluate_xor, Some(5)).unwrap();

    let saved = ron::to_string(&uninterrupted.snapshot()).unwrap();
    let snapshot: Snapshot<GeneticConfig, InnovationTracker, NNGenome> =
        ron::from_str(&saved).unwrap();
    let mut restored = XorPopulation::from_snapshot(snapshot).unwrap();
    assert_eq!(describe(&restored), describe(&uninterrupted));

    uninterrupted.run(evaluate_xor, Some(5)).unwrap();
    restored.run(evaluate_xor, Some(5)).unwrap();

    assert_eq!(restored.generation(), uninterrupted.generation());
    assert_eq!(describe(&restored), describe(&uninterrupted));
    assert_eq!(
        restored.best_genome().map(|g| g.to_string()),
        uninterrupted.best_genome().map(|g| g.to_string()),
    );
}

#[test]
fn population_size_is_kept() {
    let mut population = XorPopulation::new(population_config(5), genetic_config()).unwrap();
    for _ in 0..5 {
        population.run(evaluate_xor, Some(1)).unwrap();
        assert_eq!(population.genomes().count(), 150);
        assert_eq!(
            population.species().iter().map(|s| s.len()).sum::<usize>(),
            150
        );
    }
}
