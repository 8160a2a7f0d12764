/// Alias to a scalar floating type.
///
/// NOTE: `f64` is used as pheromone trails decay toward small values each iteration and
/// `f32` loses them to rounding noticeably earlier.
pub type Float = f64;
