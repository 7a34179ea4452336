pub mod clouds;
pub mod raindrops;
pub mod stars;

use crate::render::canvas::Surface;

pub use clouds::Cloud;
pub use raindrops::Raindrop;
pub use stars::Star;

/// Visible area particles move within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A self-contained animated entity, advanced once per frame.
pub trait Particle {
    /// Creates an instance at a random position inside `bounds`.
    fn spawn(bounds: Bounds) -> Self
    where
        Self: Sized;

    /// Advances one frame, wrapping or respawning when leaving `bounds`.
    fn update(&mut self, bounds: Bounds);

    fn draw(&self, surface: &mut dyn Surface);
}

/// Owns a homogeneous set of particles for one viewport.
pub struct ParticleSystem<P: Particle> {
    particles: Vec<P>,
    bounds: Bounds,
}

impl<P: Particle> ParticleSystem<P> {
    pub fn new(bounds: Bounds, count: usize) -> Self {
        Self {
            particles: (0..count).map(|_| P::spawn(bounds)).collect(),
            bounds,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn update(&mut self) {
        let bounds = self.bounds;
        for particle in &mut self.particles {
            particle.update(bounds);
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        for particle in &self.particles {
            particle.draw(surface);
        }
    }
}

/// Uniform integer in `[low, high]`.
pub(crate) fn random_between(low: i32, high: i32) -> i32 {
    if high <= low {
        return low;
    }
    let span = (high - low) as u32 + 1;
    low + (rand::random::<u32>() % span) as i32
}

/// Uniform float in `[low, high)`.
pub(crate) fn random_f32(low: f32, high: f32) -> f32 {
    low + rand::random::<f32>() * (high - low)
}
