use ant_colony_sim::{AntState, ColonyId, Command, Simulation, SimulationConfig, Stock, Vec2};
use proptest::prelude::*;
use std::collections::HashSet;

/// Busy world: fast short days, a keen snake and a spider most nights
fn busy_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.day_night.cycle_ms = 6000.0;
    config.snake.speed = 60.0;
    config.snake.perception_radius = 60.0;
    config.colony.spawn_interval_ms = 1000.0;
    config.spider.spawn_chance = 0.05;
    config
}

fn check_invariants(sim: &Simulation) -> Result<(), TestCaseError> {
    for ant in sim.ants() {
        prop_assert!(
            ant.carried().total() <= ant.carry_capacity() + 1e-9,
            "{} carries {} over capacity {}",
            ant.id,
            ant.carried(),
            ant.carry_capacity()
        );
        prop_assert!(sim.world().bounds().contains(ant.position));
        if ant.state() == AntState::Collecting {
            if let Some(target) = ant.target() {
                prop_assert!(sim.world().resource(target).is_some());
            }
        }
    }

    for node in sim.resources() {
        prop_assert!(node.content() >= 0.0);
        prop_assert!(node.content() <= node.capacity());
    }

    for colony in sim.colonies() {
        let members = sim.ants().iter().filter(|a| a.home() == Some(colony.id)).count();
        prop_assert!(colony.live_agents() <= colony.max_agents());
        prop_assert_eq!(colony.live_agents() as usize, members);
    }

    prop_assert!(sim.snake().body().len() <= sim.snake().length());
    prop_assert!(sim.ledger().balances(&sim.in_transit(), 1e-6));
    Ok(())
}

fn fingerprint(sim: &Simulation) -> Vec<(u32, u64, u64)> {
    sim.ants()
        .iter()
        .map(|a| (a.id.get(), a.position.x.to_bits(), a.position.y.to_bits()))
        .collect()
}

prop_compose! {
    fn arb_colony()(
        x in 30.0f64..450.0,
        y in 30.0f64..770.0
    ) -> Vec2 {
        Vec2::new(x, y)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn test_invariants_hold_every_tick(
        seed in any::<u64>(),
        home in arb_colony(),
        dt in 8.0f64..40.0,
        ticks in 200usize..1200
    ) {
        let mut sim = Simulation::new(busy_config(), seed).unwrap();
        sim.issue_placement(home).unwrap();
        let colony = sim.colonies()[0].id;

        let mut captured = HashSet::new();
        for i in 0..ticks {
            if i % 97 == 0 {
                sim.queue(Command::Spawn(colony));
            }
            let events = sim.tick(dt);
            for id in &events.captures {
                prop_assert!(captured.insert(*id), "{} captured twice", id);
            }
            for id in &captured {
                prop_assert!(sim.ant(*id).is_none());
            }
            check_invariants(&sim)?;
        }
    }

    #[test]
    fn test_same_seed_same_run(
        seed in any::<u64>(),
        home in arb_colony(),
        ticks in 100usize..600
    ) {
        let run = || {
            let mut sim = Simulation::new(busy_config(), seed).unwrap();
            sim.issue_placement(home).unwrap();
            let mut captures = Vec::new();
            for i in 0..ticks {
                if i == 50 {
                    sim.queue(Command::Spawn(ColonyId(0)));
                }
                captures.extend(sim.tick(16.0).captures);
            }
            let stock = *sim.colonies()[0].stock();
            (fingerprint(&sim), stock, captures, sim.snake().position())
        };
        prop_assert_eq!(run(), run());
    }
}

#[test]
fn test_expanding_colonies_keep_accounting() {
    let mut config = busy_config();
    config.colony.initial_stock = Stock::new(1000.0, 1000.0);
    let mut sim = Simulation::new(config, 77).unwrap();
    sim.issue_placement(Vec2::new(240.0, 400.0)).unwrap();

    let mut founded = 0;
    for _ in 0..2000 {
        if sim.try_expand().is_some() {
            founded += 1;
        }
        sim.tick(16.0);
        check_invariants(&sim).unwrap();
    }
    assert!(founded >= 1);
    assert_eq!(sim.colonies().len(), founded + 1);
    assert_eq!(sim.colonies().iter().filter(|c| c.is_primary()).count(), 1);
}
