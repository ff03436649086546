//! Force / kinematics calculators
//!
//! Pure functions from parameters to teaching-scale force values. The
//! constants are chosen so the numbers read well on screen, not to match
//! SI units.

/// Contact force per unit of mass * speed
pub const IMPACT_FORCE_K: f64 = 22.0;

/// Gravitational constant of the orbit scene
pub const G: f64 = 24_000.0;

/// Smallest gravitational force ever reported, keeps the display non-zero
pub const GRAVITY_FLOOR: f64 = 0.01;

/// Decimal places used when gravity values are shown
pub const DISPLAY_DECIMALS: i32 = 2;

/// Impact force of a strike: `round(mass * speed * K)`
pub fn impact_force(mass: u32, speed: u32) -> f64 {
    (mass as f64 * speed as f64 * IMPACT_FORCE_K).round()
}

/// Newtonian attraction between two bodies, floored at [`GRAVITY_FLOOR`]
///
/// `r` is the separation in scene units and must be positive; the orbit
/// parameters never let it fall below 120.
pub fn gravity(m1: f64, m2: f64, r: f64) -> f64 {
    (G * m1 * m2 / (r * r)).max(GRAVITY_FLOOR)
}

/// Acceleration a body of `mass` receives from `force` (a = F / m)
pub fn acceleration(force: f64, mass: f64) -> f64 {
    if mass <= 0.0 {
        return 0.0;
    }
    force / mass
}

/// Round a value for display with [`DISPLAY_DECIMALS`] places
pub fn round_for_display(value: f64) -> f64 {
    let factor = 10f64.powi(DISPLAY_DECIMALS);
    (value * factor).round() / factor
}
