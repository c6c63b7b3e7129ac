//! Targets: identity, kinematic state, lifecycle flags and the motion rule.
//!
//! A target only ever touches its own state, so `update_position` can run for
//! many targets at once.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;

use airdefense_core::config::{SimConfig, Turbulence};
use airdefense_core::state::TargetView;
use airdefense_core::types::{Position, Velocity};

/// A simulated aerial object.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: u32,
    pub position: Position,
    pub velocity: Velocity,
    /// Speed magnitude fixed at spawn; course changes preserve it.
    pub speed: f64,
    is_destroyed: bool,
    grace_remaining: u32,
}

/// Parameters shared by every motion update in a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionModel {
    pub turbulence: Turbulence,
    pub arena_half_extent: Option<f64>,
}

impl MotionModel {
    /// Straight-line motion with no boundaries.
    pub fn ballistic() -> Self {
        Self {
            turbulence: Turbulence::off(),
            arena_half_extent: None,
        }
    }
}

impl From<&SimConfig> for MotionModel {
    fn from(config: &SimConfig) -> Self {
        Self {
            turbulence: config.turbulence,
            arena_half_extent: config.arena_half_extent,
        }
    }
}

/// Where and how fast new targets appear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    /// Center of the spawn sphere.
    pub center: Position,
    /// Radius of the spawn sphere (meters).
    pub spawn_range: f64,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl From<&SimConfig> for SpawnParams {
    fn from(config: &SimConfig) -> Self {
        Self {
            center: config.sensor_position,
            spawn_range: config.spawn_range,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
        }
    }
}

impl Target {
    pub fn new(id: u32, position: Position, velocity: Velocity) -> Self {
        Self {
            id,
            position,
            velocity,
            speed: velocity.speed(),
            is_destroyed: false,
            grace_remaining: 0,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.is_destroyed
    }

    /// Ticks left before a destroyed target is removed.
    pub fn grace_remaining(&self) -> u32 {
        self.grace_remaining
    }

    /// Mark the target destroyed and start its grace countdown.
    /// Returns false if it was already destroyed; the flag is never unset.
    pub fn destroy(&mut self, grace_ticks: u32) -> bool {
        if self.is_destroyed {
            return false;
        }
        self.is_destroyed = true;
        self.grace_remaining = grace_ticks;
        true
    }

    /// Count one tick of the grace period. Returns true once it has run out.
    pub(crate) fn tick_grace(&mut self) -> bool {
        if !self.is_destroyed {
            return false;
        }
        self.grace_remaining = self.grace_remaining.saturating_sub(1);
        self.grace_remaining == 0
    }

    /// Advance the target by `dt` seconds.
    ///
    /// Live targets first get a random course change (if turbulence is on);
    /// debris keeps drifting on its last velocity. In a bounded arena any axis
    /// that crosses the wall is clamped and its velocity component reflected.
    pub fn update_position<R: Rng + ?Sized>(
        &mut self,
        dt: f64,
        motion: &MotionModel,
        rng: &mut R,
    ) {
        if !self.is_destroyed && motion.turbulence.enabled && self.speed > 0.0 {
            self.velocity = perturb_course(&self.velocity, self.speed, &motion.turbulence, rng);
        }

        self.position = self.position.advanced(&self.velocity, dt);

        if let Some(extent) = motion.arena_half_extent {
            reflect_axis(&mut self.position.x, &mut self.velocity.x, extent);
            reflect_axis(&mut self.position.y, &mut self.velocity.y, extent);
            reflect_axis(&mut self.position.z, &mut self.velocity.z, extent);
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    pub fn view(&self) -> TargetView {
        TargetView {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            speed: self.speed,
            is_destroyed: self.is_destroyed,
            grace_remaining: self.grace_remaining,
        }
    }
}

/// Create a target uniformly distributed inside the spawn sphere, heading in a
/// uniformly random direction at a speed drawn from `[min_speed, max_speed]`.
pub fn spawn_random<R: Rng + ?Sized>(rng: &mut R, id: u32, params: &SpawnParams) -> Target {
    // cbrt keeps the density uniform over the ball's volume.
    let radius = params.spawn_range * rng.gen::<f64>().cbrt();
    let offset = random_unit_vector(rng) * radius;
    let position = Position::from(DVec3::from(params.center) + offset);

    let speed = if params.max_speed > params.min_speed {
        rng.gen_range(params.min_speed..=params.max_speed)
    } else {
        params.min_speed
    };
    let velocity = Velocity::from_direction(random_unit_vector(rng), speed);

    Target::new(id, position, velocity)
}

/// Uniform direction on the unit sphere.
fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
    let z: f64 = rng.gen_range(-1.0..=1.0);
    let phi: f64 = rng.gen_range(0.0..TAU);
    let ring = (1.0 - z * z).max(0.0).sqrt();
    DVec3::new(ring * phi.cos(), ring * phi.sin(), z)
}

/// Rotate the course by a random yaw and pitch, keeping the elevation bounded.
fn perturb_course<R: Rng + ?Sized>(
    velocity: &Velocity,
    speed: f64,
    turbulence: &Turbulence,
    rng: &mut R,
) -> Velocity {
    let max_turn = turbulence.max_turn_deg.to_radians();
    let max_elevation = turbulence.max_elevation_deg.to_radians();

    let (yaw, pitch) = if max_turn > 0.0 {
        (
            rng.gen_range(-max_turn..=max_turn),
            rng.gen_range(-max_turn..=max_turn),
        )
    } else {
        (0.0, 0.0)
    };

    let heading = velocity.heading() + yaw;
    let elevation = (velocity.elevation() + pitch).clamp(-max_elevation, max_elevation);
    let direction = DVec3::new(
        elevation.cos() * heading.sin(),
        elevation.cos() * heading.cos(),
        elevation.sin(),
    );
    Velocity::from_direction(direction, speed)
}

fn reflect_axis(position: &mut f64, velocity: &mut f64, extent: f64) {
    if *position > extent {
        *position = extent;
        if *velocity > 0.0 {
            *velocity = -*velocity;
        }
    } else if *position < -extent {
        *position = -extent;
        if *velocity < 0.0 {
            *velocity = -*velocity;
        }
    }
}
