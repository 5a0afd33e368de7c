/// Computes the Euclidean distance between two vectors.
///
/// 0 means identical, larger means less similar. Uses f64 intermediate
/// precision. Returns infinity for mismatched dimensions so a malformed
/// comparison can never look like a match.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }

    let mut sum: f64 = 0.0;
    for i in 0..a.len() {
        let d = a[i] as f64 - b[i] as f64;
        sum += d * d;
    }
    sum.sqrt() as f32
}
