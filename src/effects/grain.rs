use image::RgbaImage;
use rand::Rng;

/// Standard normal samples via the Box-Muller transform, yielding both values of each pair.
pub(crate) struct NormalSampler {
    spare: Option<f64>,
}

impl NormalSampler {
    pub(crate) fn new() -> Self {
        Self { spare: None }
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        // u1 in (0, 1] keeps ln finite.
        let u1 = 1.0 - rng.gen_range(0.0f64..1.0);
        let u2 = rng.gen_range(0.0f64..1.0);
        let mag = (-2.0 * u1.ln()).sqrt();
        let theta = std::f64::consts::TAU * u2;
        self.spare = Some(mag * theta.sin());
        mag * theta.cos()
    }
}

/// Adds zero-mean gaussian noise with standard deviation `intensity * 255` to the color
/// channels. Alpha is untouched.
pub fn add_film_grain<R: Rng + ?Sized>(img: &mut RgbaImage, intensity: f64, rng: &mut R) {
    if intensity <= 0.0 || !intensity.is_finite() {
        return;
    }
    let sigma = intensity * 255.0;
    let mut normal = NormalSampler::new();
    for px in img.pixels_mut() {
        for c in 0..3 {
            let v = f64::from(px[c]) + normal.sample(rng) * sigma;
            px[c] = v.clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grain.rs"]
mod tests;
