use rand::Rng;

/// One floating dot of the background decoration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub left_percent: f64,
    pub top_percent: f64,
    pub size_px: f64,
    pub duration_secs: f64,
    pub delay_secs: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
}

impl ParticleField {
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                left_percent: rng.gen_range(0.0..100.0),
                top_percent: rng.gen_range(0.0..100.0),
                size_px: rng.gen_range(2.0..8.0),
                duration_secs: rng.gen_range(10.0..30.0),
                delay_secs: rng.gen_range(0.0..10.0),
                opacity: rng.gen_range(0.1..0.6),
            })
            .collect();
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
