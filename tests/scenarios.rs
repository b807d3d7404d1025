// End-to-end scenarios through the public simulation API.

use ant_colony_sim::colony::Colony;
use ant_colony_sim::config::AntConfig;
use ant_colony_sim::prelude::*;
use ant_colony_sim::world::Bounds;

const DT: f64 = 16.0;

fn quiet_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.colony.initial_ants = 0;
    config.spider.enabled = false;
    config
}

#[test]
fn contact_tick_extracts_up_to_carry_capacity() {
    let mut sim = Simulation::builder(quiet_config())
        .seed(1)
        .populate(false)
        .snake_at(Vec2::new(470.0, 790.0))
        .colony(Vec2::new(400.0, 100.0))
        .resource_with(NodeKind::Rock, Vec2::new(105.0, 100.0), 50.0)
        .ant(Vec2::new(100.0, 100.0))
        .build()
        .unwrap();
    let node = sim.resources()[0].id;

    // First tick spots the node, second is the contact tick
    sim.tick(DT);
    assert_eq!(sim.ants()[0].state(), AntState::Collecting);
    sim.tick(DT);

    let ant = &sim.ants()[0];
    assert_eq!(ant.carried().minerals, 10.0);
    assert_eq!(ant.state(), AntState::Returning);
    assert_eq!(sim.world().resource(node).unwrap().content(), 40.0);
}

#[test]
fn colony_spawns_until_cap() {
    let cost = Stock::new(8.0, 15.0);
    let bounds = Bounds::new(480.0, 800.0);
    let mut rng = fastrand::Rng::with_seed(3);
    let mut colony = Colony::new_primary(
        ColonyId(0),
        Vec2::new(240.0, 400.0),
        &SimulationConfig::default().colony,
    )
    .with_stock(Stock::new(8.0, 15.0))
    .with_max_agents(1);

    assert!(colony.can_spawn_agent(&cost));
    colony
        .spawn_agent(AgentId(0), &cost, &AntConfig::default(), &bounds, &mut rng)
        .unwrap();
    assert_eq!(*colony.stock(), Stock::new(0.0, 0.0));
    assert_eq!(colony.live_agents(), 1);

    let err = colony
        .spawn_agent(AgentId(1), &cost, &AntConfig::default(), &bounds, &mut rng)
        .unwrap_err();
    assert!(matches!(err, SimError::PopulationCap { .. }));
}

#[test]
fn requested_spawn_respects_cap_and_cost() {
    let mut config = quiet_config();
    config.colony.initial_stock = Stock::new(8.0, 15.0);
    config.colony.max_agents = 1;
    let mut sim = Simulation::builder(config)
        .populate(false)
        .colony(Vec2::new(240.0, 400.0))
        .build()
        .unwrap();
    let colony = sim.colonies()[0].id;

    let ant = sim.request_spawn(colony).unwrap();
    assert_eq!(sim.ant(ant).unwrap().home(), Some(colony));
    assert_eq!(*sim.colonies()[0].stock(), Stock::new(0.0, 0.0));
    assert_eq!(sim.colonies()[0].live_agents(), 1);

    assert!(matches!(
        sim.request_spawn(colony),
        Err(SimError::PopulationCap { .. })
    ));
    assert_eq!(sim.ants().len(), 1);
}

#[test]
fn snake_captures_ant_within_reach() {
    let mut sim = Simulation::builder(quiet_config())
        .populate(false)
        .snake_at(Vec2::new(200.0, 200.0))
        .colony(Vec2::new(400.0, 700.0))
        .ant(Vec2::new(203.0, 200.0))
        .build()
        .unwrap();
    let victim = sim.ants()[0].id;
    let length = sim.snake().length();

    let events = sim.tick(DT);
    assert_eq!(events.captures, vec![victim]);
    assert!(sim.ant(victim).is_none());
    assert_eq!(sim.snake().length(), length + 1);
    assert_eq!(sim.colonies()[0].live_agents(), 0);

    for _ in 0..50 {
        let events = sim.tick(DT);
        assert!(!events.captures.contains(&victim));
    }
    assert_eq!(sim.snake().length(), length + 1);
}

#[test]
fn nearby_snake_overrides_collection() {
    let mut sim = Simulation::builder(quiet_config())
        .populate(false)
        .snake_at(Vec2::new(100.0, 130.0))
        .colony(Vec2::new(400.0, 700.0))
        .resource_with(NodeKind::Rock, Vec2::new(105.0, 100.0), 50.0)
        .ant(Vec2::new(100.0, 100.0))
        .build()
        .unwrap();
    let heading = sim.ants()[0].direction();

    sim.tick(DT);
    let ant = &sim.ants()[0];
    assert_ne!(ant.direction(), heading);
    assert_eq!(ant.state(), AntState::Exploring);
    assert_eq!(ant.target(), None);
    assert!(ant.carried().is_empty());
    assert_eq!(sim.resources()[0].content(), 50.0);
}

#[test]
fn scare_point_freezes_collection_in_progress() {
    let mut sim = Simulation::builder(quiet_config())
        .populate(false)
        .snake_at(Vec2::new(470.0, 790.0))
        .colony(Vec2::new(400.0, 700.0))
        .resource_with(NodeKind::Rock, Vec2::new(105.0, 100.0), 50.0)
        .ant(Vec2::new(100.0, 100.0))
        .build()
        .unwrap();

    sim.tick(DT);
    let target = sim.ants()[0].target();
    assert!(target.is_some());

    let ant_position = sim.ants()[0].position;
    sim.set_scare_point(Some(ant_position + Vec2::new(-5.0, 0.0)));
    sim.tick(DT);

    let ant = &sim.ants()[0];
    assert_eq!(ant.target(), target);
    assert_eq!(ant.state(), AntState::Collecting);
    assert!(ant.carried().is_empty());
    assert_eq!(sim.resources()[0].content(), 50.0);
}

#[test]
fn foraging_fills_the_colony() {
    let mut config = quiet_config();
    config.colony.initial_ants = 4;
    let mut sim = Simulation::builder(config)
        .seed(9)
        .snake_at(Vec2::new(470.0, 790.0))
        .colony(Vec2::new(240.0, 400.0))
        .build()
        .unwrap();
    let start = *sim.colonies()[0].stock();

    let mut deposited = 0.0;
    for _ in 0..3000 {
        let events = sim.tick(DT);
        deposited += events.deposits.iter().map(|(_, _, amount)| amount).sum::<f64>();
    }
    assert!(deposited > 0.0);
    let ledger = sim.ledger();
    let deposited_total = ledger.deposited.total();
    assert!((deposited - deposited_total).abs() < 1e-6);
    assert!(ledger.balances(&sim.in_transit(), 1e-6));
    // Stock only grows by deposits and shrinks by spawns
    let spent = sim.colonies()[0].live_agents() as f64 + sim.captures() as f64 - 4.0;
    let expected = start.total() + deposited_total - spent * 23.0;
    assert!((sim.colonies()[0].stock().total() - expected).abs() < 1e-6);
}
