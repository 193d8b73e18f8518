use std::f64::consts::{PI, SQRT_2};

/// Orthonormal 2-D DCT-II of a row-major `size` x `size` grid, computed as a
/// 1-D pass over the rows followed by one over the columns.
pub fn dct_2d(samples: &[f64], size: usize) -> Vec<f64> {
    assert_eq!(samples.len(), size * size);

    let cos_table: Vec<f64> = (0..size)
        .flat_map(|u| {
            (0..size).map(move |x| {
                ((2 * x + 1) as f64 * u as f64 * PI / (2.0 * size as f64)).cos()
            })
        })
        .collect();
    let scale = (2.0 / size as f64).sqrt();

    let mut rows = vec![0.0; size * size];
    for y in 0..size {
        for u in 0..size {
            let mut sum = 0.0;
            for x in 0..size {
                sum += samples[y * size + x] * cos_table[u * size + x];
            }
            let cu = if u == 0 { 1.0 / SQRT_2 } else { 1.0 };
            rows[y * size + u] = sum * cu * scale;
        }
    }

    let mut freq = vec![0.0; size * size];
    for x in 0..size {
        for v in 0..size {
            let mut sum = 0.0;
            for y in 0..size {
                sum += rows[y * size + x] * cos_table[v * size + y];
            }
            let cv = if v == 0 { 1.0 / SQRT_2 } else { 1.0 };
            freq[v * size + x] = sum * cv * scale;
        }
    }

    freq
}

/// Multi-level 2-D Haar decomposition, in place. Returns the approximation
/// band, a `size >> levels` square in row-major order.
pub fn haar_2d(samples: &mut [f64], size: usize, levels: u32) -> Vec<f64> {
    assert_eq!(samples.len(), size * size);
    assert!(size.is_power_of_two());
    assert!(size >> levels >= 1);

    let mut current = size;
    for _ in 0..levels {
        haar_rows(samples, size, current);
        haar_cols(samples, size, current);
        current /= 2;
    }

    let mut approx = Vec::with_capacity(current * current);
    for y in 0..current {
        approx.extend_from_slice(&samples[y * size..y * size + current]);
    }
    approx
}

fn haar_rows(samples: &mut [f64], stride: usize, current: usize) {
    let half = current / 2;
    let mut tmp = vec![0.0; current];
    for y in 0..current {
        let row = y * stride;
        for i in 0..half {
            let a = samples[row + 2 * i];
            let b = samples[row + 2 * i + 1];
            tmp[i] = (a + b) / SQRT_2;
            tmp[half + i] = (a - b) / SQRT_2;
        }
        samples[row..row + current].copy_from_slice(&tmp);
    }
}

fn haar_cols(samples: &mut [f64], stride: usize, current: usize) {
    let half = current / 2;
    let mut tmp = vec![0.0; current];
    for x in 0..current {
        for i in 0..half {
            let a = samples[2 * i * stride + x];
            let b = samples[(2 * i + 1) * stride + x];
            tmp[i] = (a + b) / SQRT_2;
            tmp[half + i] = (a - b) / SQRT_2;
        }
        for (i, value) in tmp.iter().enumerate() {
            samples[i * stride + x] = *value;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9
    }

    #[test]
    fn dct_of_flat_grid_is_pure_dc() {
        let samples = vec![1.0; 16];
        let freq = dct_2d(&samples, 4);

        // orthonormal DCT puts a flat signal entirely into the DC term
        assert!(close(4.0, freq[0]), "dc was {}", freq[0]);
        for (i, c) in freq.iter().enumerate().skip(1) {
            assert!(close(0.0, *c), "coefficient {i} was {c}");
        }
    }

    #[test]
    fn dct_is_linear() {
        let a = vec![3.0; 16];
        let freq = dct_2d(&a, 4);
        let scaled = dct_2d(&a.iter().map(|x| x * 2.0).collect::<Vec<_>>(), 4);
        for (x, y) in freq.iter().zip(scaled.iter()) {
            assert!(close(x * 2.0, *y));
        }
    }

    #[test]
    fn haar_of_flat_grid_keeps_the_average() {
        let mut samples = vec![1.0; 16];
        let approx = haar_2d(&mut samples, 4, 1);
        assert_eq!(4, approx.len());
        for c in &approx {
            assert!(close(2.0, *c), "coefficient was {c}");
        }

        let mut samples = vec![1.0; 16];
        let approx = haar_2d(&mut samples, 4, 2);
        assert_eq!(1, approx.len());
        assert!(close(4.0, approx[0]));
    }

    #[test]
    fn haar_separates_a_step() {
        // left half bright, right half dark
        let mut samples = vec![
            8.0, 8.0, 0.0, 0.0, //
            8.0, 8.0, 0.0, 0.0, //
            8.0, 8.0, 0.0, 0.0, //
            8.0, 8.0, 0.0, 0.0, //
        ];
        let approx = haar_2d(&mut samples, 4, 1);
        for (c, expected) in approx.iter().zip([16.0, 0.0, 16.0, 0.0]) {
            assert!(close(expected, *c), "coefficient was {c}");
        }
    }
}
