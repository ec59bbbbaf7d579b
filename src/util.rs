/// Narrow a map-space value for painting. Out-of-range values saturate to
/// infinity, which the painter simply clips.
pub const fn f64_to_f32(value: f64) -> f32 {
    #[allow(clippy::cast_possible_truncation)]
    {
        value as f32
    }
}
