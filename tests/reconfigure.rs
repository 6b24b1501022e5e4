mod common;

use common::*;
use racesim::{
    SimError,
    sim::{PitCommand, TireChange},
};

#[test]
fn refuel_stops_at_a_full_tank() {
    let mut elt = car_elt(0, 0.0, 0.0);
    elt.fuel = 80.0;
    let mut setup = Setup::new(vec![elt]);
    setup.car_mut(0).pit_cmd = PitCommand {
        fuel: 50.0,
        ..Default::default()
    };

    setup.sim.reconfigure(&mut setup.situation, 0).unwrap();
    assert_eq!(setup.car(0).fuel, 100.0);

    // and sticks through the next tick
    setup.tick();
    assert!(setup.car(0).fuel <= 100.0);
    assert!(setup.car(0).fuel > 99.0);
}

#[test]
fn repair_keeps_damage_in_range() {
    let mut over = car_elt(0, 0.0, 0.0);
    over.damage = 250.0;
    let mut light = car_elt(1, 30.0, 0.0);
    light.damage = 30.0;
    let mut setup = Setup::new(vec![over, light]);

    setup.car_mut(0).pit_cmd.repair = 10.0;
    setup.car_mut(1).pit_cmd.repair = 50.0;
    setup.sim.reconfigure(&mut setup.situation, 0).unwrap();
    setup.sim.reconfigure(&mut setup.situation, 1).unwrap();

    assert_eq!(setup.car(0).damage, MAX_DAMAGE);
    assert_eq!(setup.car(1).damage, 0.0);

    // at the limit is not over it
    setup.tick();
    assert!(!setup.car(0).status.broken);
}

#[test]
fn new_tires_come_without_wear() {
    let mut elt = car_elt(0, 0.0, 0.0);
    for wheel in &mut elt.wheels {
        wheel.wear = 0.4;
        wheel.graining = 0.1;
    }
    let mut setup = Setup::new(vec![elt]);

    setup.car_mut(0).pit_cmd.tire_change = TireChange::None;
    setup.sim.reconfigure(&mut setup.situation, 0).unwrap();
    assert!(setup.car(0).wheels.iter().all(|wheel| wheel.wear == 0.4));

    setup.car_mut(0).pit_cmd.tire_change = TireChange::All;
    setup.sim.reconfigure(&mut setup.situation, 0).unwrap();
    assert!(setup.car(0).wheels.iter().all(|wheel| wheel.wear == 0.0 && wheel.graining == 0.0));
}

#[test]
fn unknown_slot_is_an_error() {
    let mut setup = Setup::new(vec![car_elt(0, 0.0, 0.0)]);
    assert!(matches!(
        setup.sim.reconfigure(&mut setup.situation, 4),
        Err(SimError::UnknownCar { index: 4 })
    ));
}

#[test]
fn pit_deltas_below_zero_are_ignored() {
    let mut elt = car_elt(0, 0.0, 0.0);
    elt.damage = 20.0;
    let mut setup = Setup::new(vec![elt]);

    setup.car_mut(0).pit_cmd = PitCommand {
        fuel: -30.0,
        repair: -40.0,
        ..Default::default()
    };
    setup.sim.reconfigure(&mut setup.situation, 0).unwrap();
    assert_eq!(setup.car(0).fuel, 50.0);
    assert_eq!(setup.car(0).damage, 20.0);

    setup.car_mut(0).pit_cmd = PitCommand {
        fuel: f32::NAN,
        repair: f32::NAN,
        ..Default::default()
    };
    setup.sim.reconfigure(&mut setup.situation, 0).unwrap();
    assert_eq!(setup.car(0).fuel, 50.0);
    assert_eq!(setup.car(0).damage, 20.0);

    // still a healthy car on the next tick
    setup.tick();
    assert!(setup.car(0).fuel.is_finite());
    assert!(!setup.car(0).status.broken);
}
