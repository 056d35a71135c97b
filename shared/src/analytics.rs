//! Numeric helpers used by the loader and the dashboard.
//!
//! Stock indices only trade five days a week while crypto trades 24/7,
//! so joined daily rows have gaps on the equity side. The dashboard
//! bridges them with a forward fill before averaging or charting, and
//! the loader drops outliers by z-score before rows reach MySQL.

/// Arithmetic mean. `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn std_dev(values: &[f64], mu: f64) -> f64 {
    let var = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Pearson correlation coefficient.
///
/// `None` when the slices differ in length, hold fewer than two
/// points, or either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        cov += (x - mx) * (y - my);
        vx += (x - mx).powi(2);
        vy += (y - my).powi(2);
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx.sqrt() * vy.sqrt()))
}

/// Symmetric correlation matrix over aligned series.
///
/// The diagonal is 1.0; degenerate pairs (constant series) report 0.0.
pub fn correlation_matrix(series: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = series.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&series[i], &series[j]).unwrap_or(0.0);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

/// Forward fill over a daily series.
///
/// `None` and non-positive values both count as gaps (a missing join
/// leg surfaces as NULL or 0 depending on the query). Gaps take the
/// last seen value; leading gaps become 0.0.
pub fn fill_series(values: &[Option<f64>]) -> Vec<f64> {
    let mut filled = Vec::with_capacity(values.len());
    let mut last: Option<f64> = None;
    for v in values {
        match v {
            Some(v) if *v > 0.0 => {
                last = Some(*v);
                filled.push(*v);
            }
            _ => filled.push(last.unwrap_or(0.0)),
        }
    }
    filled
}

/// Indices of values whose z-score is within `threshold`.
///
/// Series shorter than 3 points or with zero spread are kept whole;
/// there is nothing meaningful to reject there.
pub fn zscore_keep(values: &[f64], threshold: f64) -> Vec<usize> {
    if values.len() < 3 {
        return (0..values.len()).collect();
    }
    let mu = match mean(values) {
        Some(mu) => mu,
        None => return Vec::new(),
    };
    let sigma = std_dev(values, mu);
    if sigma == 0.0 {
        return (0..values.len()).collect();
    }
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| ((*v - mu) / sigma).abs() <= threshold)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0, 6.0]), Some(4.0));
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        let inv = [8.0, 6.0, 4.0, 2.0];
        let r = pearson(&xs, &inv).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate() {
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        // zero variance on one side
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_correlation_matrix_shape() {
        let series = vec![
            vec![1.0, 2.0, 3.0],
            vec![2.0, 4.0, 6.0],
            vec![5.0, 5.0, 5.0],
        ];
        let m = correlation_matrix(&series);
        assert_eq!(m.len(), 3);
        assert_eq!(m[0][0], 1.0);
        assert!((m[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(m[0][1], m[1][0]);
        // constant series correlates with nothing
        assert_eq!(m[0][2], 0.0);
        assert_eq!(m[2][2], 1.0);
    }

    #[test]
    fn test_fill_series_bridges_gaps() {
        let values = [Some(10.0), None, Some(0.0), Some(12.0), None];
        assert_eq!(fill_series(&values), vec![10.0, 10.0, 10.0, 12.0, 12.0]);
    }

    #[test]
    fn test_fill_series_leading_gap() {
        let values = [None, Some(0.0), Some(5.0)];
        assert_eq!(fill_series(&values), vec![0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_zscore_keep_drops_spike() {
        let mut values = vec![100.0; 20];
        values.push(100_000.0);
        let kept = zscore_keep(&values, 3.0);
        assert_eq!(kept.len(), 20);
        assert!(!kept.contains(&20));
    }

    #[test]
    fn test_zscore_keep_degenerate() {
        assert_eq!(zscore_keep(&[1.0, 2.0], 3.0), vec![0, 1]);
        assert_eq!(zscore_keep(&[7.0, 7.0, 7.0], 3.0), vec![0, 1, 2]);
    }
}
