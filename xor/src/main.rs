use ferroneat::{logging::Stats, Genome, GenomeKey, Population, PopulationConfig, Snapshot};
use ferroneat_nn::genomics::{
    ActivationType, AggregationType, BoolAttribute, ChoiceAttribute, FloatAttribute,
    GeneticConfig, InitialConnection, InnovationTracker, NNGenome,
};
use ferroneat_nn::networks::FeedForwardNetwork;

use std::fs;
use std::num::NonZeroUsize;

use rayon::prelude::*;

const XOR: [([f32; 2], f32); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

const CHECKPOINT: &str = "xor-checkpoint.ron";

type XorPopulation = Population<GeneticConfig, InnovationTracker, NNGenome>;

fn evaluate_xor(genome: &NNGenome, config: &GeneticConfig) -> f32 {
    let mut network = FeedForwardNetwork::create(genome, config);
    let mut fitness = 4.0;
    for (input, expected) in XOR {
        match network.activate(&input) {
            Ok(output) => fitness -= (output[0] - expected).powi(2),
            Err(e) => {
                eprintln!("{}", e);
                return 0.0;
            }
        }
    }
    fitness
}

/// Evaluates every genome in parallel, then reports
/// the generation's fitness statistics.
fn evaluate_generation(genomes: &mut [(GenomeKey, &mut NNGenome)], config: &GeneticConfig) {
    genomes.par_iter_mut().for_each(|(_, genome)| {
        let fitness = evaluate_xor(genome, config);
        genome.set_fitness(fitness);
    });

    if let Some(stats) = Stats::from(genomes.iter().filter_map(|(_, g)| g.fitness())) {
        println!(
            "fitness: max {:.3}, mean {:.3}, median {:.3}, stdev {:.3}",
            stats.maximum, stats.mean, stats.median, stats.stdev
        );
    }
}

fn main() {
    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok());

    let genetic_config = GeneticConfig {
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
    };
    let population_config = PopulationConfig {
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
        seed,
        ..PopulationConfig::zero()
    };

    let mut population = match XorPopulation::new(population_config, genetic_config) {
        Ok(population) => population,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    // Evolve for a while, checkpoint, and resume from the checkpoint.
    if let Err(e) = population.run(evaluate_generation, Some(10)) {
        eprintln!("{}", e);
        return;
    }
    if let Err(e) = checkpoint(&population) {
        eprintln!("Could not save checkpoint: {}", e);
    }
    let mut population = match restore() {
        Ok(restored) => restored,
        Err(e) => {
            eprintln!("Could not restore checkpoint: {}", e);
            population
        }
    };

    match population.run(evaluate_generation, Some(290)) {
        Ok(Some(best)) => {
            println!(
                "Best genome after {} generations:\n{}",
                population.generation(),
                best
            );
            report(&best, population.genetic_config());
        }
        Ok(None) => println!("No genome was evaluated"),
        Err(e) => eprintln!("{}", e),
    }
}

fn checkpoint(population: &XorPopulation) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(CHECKPOINT, ron::to_string(&population.snapshot())?)?;
    println!(
        "Saved generation {} to {}",
        population.generation(),
        CHECKPOINT
    );
    Ok(())
}

fn restore() -> Result<XorPopulation, Box<dyn std::error::Error>> {
    let snapshot: Snapshot<GeneticConfig, InnovationTracker, NNGenome> =
        ron::from_str(&fs::read_to_string(CHECKPOINT)?)?;
    Ok(XorPopulation::from_snapshot(snapshot)?)
}

fn report(genome: &NNGenome, config: &GeneticConfig) {
    let mut network = FeedForwardNetwork::create(genome, config);
    for (input, expected) in XOR {
        if let Ok(output) = network.activate(&input) {
            println!(
                "input {:?}, expected {:.1}, got {:.3}",
                input, expected, output[0]
            );
        }
    }
}
