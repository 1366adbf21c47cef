//! Ordinary least-squares fitting over `(x, y)` pairs.

/// Slope of the least-squares line `y = slope * x + intercept`.
///
/// Uses the mean-centred form, which stays accurate when `x` values are
/// large day offsets. Returns `None` for fewer than two points, mismatched
/// lengths, or when every `x` is identical (the slope is undefined).
pub fn least_squares_slope(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (sxy, sxx) = xs
        .iter()
        .zip(ys)
        .fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = x - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });

    if sxx == 0.0 {
        return None;
    }
    Some(sxy / sxx)
}

#[cfg(test)]
mod tests {
    use super::least_squares_slope;

    #[test]
    fn test_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let slope = least_squares_slope(&xs, &ys).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_noisy_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.1, 0.4, 1.1, 1.4];
        let slope = least_squares_slope(&xs, &ys).unwrap();
        assert!((slope - 0.46).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(least_squares_slope(&[1.0], &[2.0]), None);
        assert_eq!(least_squares_slope(&[1.0, 2.0], &[2.0]), None);
        assert_eq!(least_squares_slope(&[4.0, 4.0, 4.0], &[1.0, 2.0, 3.0]), None);
    }
}
