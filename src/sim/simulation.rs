use arrayvec::ArrayVec;
use log::{debug, info, warn};

use super::{
    Car, CarBody, CarCollider, CarElt, CarModels, PipelineStage, RemovalStage, SimConfig,
    Situation, StepContext, TelemetryRecord, TelemetrySink, TireChange, Track,
};
use crate::{
    consts::MAX_CARS,
    error::{SimError, SimResult},
};

/// Owns every car taking part in a session and steps them together.
///
/// The public [`CarElt`] records stay with the caller; they are read at the
/// start of a tick and written back at its end.
pub struct Simulation {
    config: SimConfig,
    track: Box<dyn Track>,
    collider: Box<dyn CarCollider>,
    cars: ArrayVec<Car, MAX_CARS>,
    telemetry: Option<Box<dyn TelemetrySink>>,
}

impl Simulation {
    pub fn new(config: SimConfig, track: Box<dyn Track>, collider: Box<dyn CarCollider>) -> SimResult<Self> {
        config.validate()?;
        info!(
            "Simulation set up for {} cars (fuel x{}, damage x{}, tires x{})",
            config.num_cars, config.fuel_factor, config.damage_factor, config.tire_factor
        );

        Ok(Self {
            config,
            track,
            collider,
            cars: ArrayVec::new(),
            telemetry: None,
        })
    }

    /// Adds the car of `elt` to the next free slot,
    /// returning the slot index.
    /// `elt.index` must be that slot.
    pub fn add_car(&mut self, elt: &mut CarElt, models: CarModels) -> SimResult<usize> {
        let index = self.cars.len();
        if index >= self.config.num_cars {
            return Err(SimError::CarTableFull {
                capacity: self.config.num_cars,
            });
        }
        if elt.index != index {
            return Err(SimError::CarIndexMismatch {
                index: elt.index,
                expected: index,
            });
        }

        let car = Car::new(elt, models);
        self.collider.add_car(index, car.body.dimensions);
        car.commit(elt);
        self.cars
            .try_push(car)
            .map_err(|_| SimError::CarTableFull { capacity: MAX_CARS })?;

        debug!("Car {index} added with {:.1} of {:.1} fuel", elt.fuel, elt.tank);
        Ok(index)
    }

    pub fn set_telemetry(&mut self, sink: Box<dyn TelemetrySink>) {
        self.telemetry = Some(sink);
    }

    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub fn num_cars(&self) -> usize {
        self.cars.len()
    }

    #[must_use]
    pub fn car(&self, index: usize) -> Option<&Car> {
        self.cars.get(index)
    }

    #[must_use]
    pub fn track(&self) -> &dyn Track {
        self.track.as_ref()
    }

    /// Advances every car by `dt` seconds.
    ///
    /// Each car either moves one step along its withdrawal or runs its full
    /// model pipeline. Contacts between the simulated cars are resolved once all
    /// of them have moved, then every car is published back into `situation`.
    ///
    /// A car whose state goes non-finite aborts the tick with
    /// [`SimError::InvariantViolation`], leaving `situation` untouched past that car.
    pub fn update(&mut self, situation: &mut Situation, dt: f32, telemetry: bool) -> SimResult<()> {
        let Self {
            config,
            track,
            collider,
            cars,
            telemetry: sink,
        } = self;

        let ctx = StepContext {
            dt,
            phase: situation.phase,
            track: &**track,
            config: &*config,
        };
        let max_damage = situation.max_damage;

        for car in cars.iter_mut() {
            car.body.collision = 0;
            car.body.blocked = false;
        }

        for (car, elt) in cars.iter_mut().zip(situation.cars.iter_mut()) {
            if elt.status.removal != RemovalStage::Active {
                car.step_removal(elt, dt);
                continue;
            }

            if elt.status.in_pit {
                if car.body.is_over_damage(max_damage) {
                    info!("Car {} broke down in the pit and leaves its box", car.body.index);
                    elt.status.in_pit = false;
                } else {
                    continue;
                }
            }

            if car.has_failed(&elt.status, max_damage) && car.begin_removal(elt, max_damage, &ctx) {
                collider.remove_car(car.body.index);
                continue;
            }

            car.update(elt, &ctx)?;
        }

        {
            let mut bodies: ArrayVec<&mut CarBody, MAX_CARS> = cars
                .iter_mut()
                .zip(&situation.cars)
                .filter(|(_, elt)| !elt.status.no_simulation())
                .map(|(car, _)| &mut car.body)
                .collect();
            collider.collide(&mut bodies, &ctx);
        }

        for (car, elt) in cars.iter_mut().zip(situation.cars.iter_mut()) {
            if !elt.status.no_simulation() {
                car.check(PipelineStage::Collision)?;
                car.models.chassis.update_post(&mut car.body, &ctx);

                if telemetry && let Some(sink) = sink.as_mut() {
                    let record = TelemetryRecord::from_body(&car.body);
                    if let Err(err) = sink.write_record(car.body.index, &record) {
                        warn!("Car {}: telemetry write failed: {err}", car.body.index);
                    }
                }
            }

            car.commit(elt);
        }

        Ok(())
    }

    /// Applies the pit stop in `situation.cars[index].pit_cmd` and refreshes the models
    pub fn reconfigure(&mut self, situation: &mut Situation, index: usize) -> SimResult<()> {
        let max_damage = situation.max_damage;
        let (Some(car), Some(elt)) = (self.cars.get_mut(index), situation.cars.get_mut(index)) else {
            return Err(SimError::UnknownCar { index });
        };

        let pit = elt.pit_cmd;
        let body = &mut car.body;
        if pit.fuel > 0.0 {
            body.fuel = (body.fuel + pit.fuel).clamp(0.0, body.tank);
        }
        if pit.repair > 0.0 {
            body.damage = (body.damage - pit.repair).max(0.0);
        }
        if max_damage > 0.0 {
            body.damage = body.damage.min(max_damage);
        }

        let models = &mut car.models;
        models.chassis.reconfigure_steering(body);
        models.chassis.reconfigure_brakes(body);
        for wing in &mut models.wings {
            wing.reconfigure(body);
        }
        for axle in &mut models.axles {
            axle.reconfigure(body);
        }
        for wheel in &mut models.wheels {
            wheel.reconfigure(body);
            if pit.tire_change == TireChange::All {
                wheel.reset_wear(body);
            }
        }
        models.transmission.reconfigure(body);

        info!(
            "Car {index} left the pit with {:.1} fuel and {:.0} damage",
            body.fuel, body.damage
        );
        car.commit(elt);
        Ok(())
    }

    /// Releases every model and flushes the telemetry
    pub fn shutdown(mut self) {
        self.collider.shutdown();
        for car in &mut self.cars {
            car.shutdown();
        }

        if let Some(sink) = self.telemetry.as_mut()
            && let Err(err) = sink.flush()
        {
            warn!("Telemetry flush failed: {err}");
        }

        info!("Simulation shut down ({} cars)", self.cars.len());
    }
}
