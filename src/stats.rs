//! Statistical comparators for the aggregated index tables.
//!
//! `mann_whitney_u` — two-sided rank-sum test with midrank tie handling and
//! the tie-corrected normal approximation (continuity-corrected), the form
//! appropriate at the study's group sizes (n ≈ 29).
//!
//! `two_way_anova` — condition × model factorial ANOVA (main effects +
//! interaction) over the 2×2 cell samples.
//!
//! NaN entries must be filtered out before calling; the aggregator's
//! [`crate::aggregate::IndexTable::valid_column`] does that.
use anyhow::{ensure, Result};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal};

/// Result of a two-sided Mann-Whitney U test.
#[derive(Debug, Clone, Copy)]
pub struct MannWhitney {
    /// The smaller of U₁ and U₂.
    pub u: f64,
    /// Continuity-corrected standard normal statistic.
    pub z: f64,
    /// Two-sided p-value.
    pub p: f64,
    pub n1: usize,
    pub n2: usize,
}

/// Two-sided Mann-Whitney U test between two independent samples.
///
/// Identical samples give z = 0 and p = 1.0.  Errors if either sample is
/// empty or contains NaN.
pub fn mann_whitney_u(xs: &[f64], ys: &[f64]) -> Result<MannWhitney> {
    ensure!(!xs.is_empty() && !ys.is_empty(), "empty sample");
    ensure!(
        xs.iter().chain(ys.iter()).all(|v| !v.is_nan()),
        "NaN in sample; filter missing values first"
    );

    let n1 = xs.len();
    let n2 = ys.len();
    let n = n1 + n2;

    // Midranks over the pooled sample.
    let mut pooled: Vec<(f64, usize)> = xs
        .iter()
        .map(|&v| (v, 0usize))
        .chain(ys.iter().map(|&v| (v, 1usize)))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut rank_sum_x = 0.0_f64;
    let mut tie_term = 0.0_f64; // Σ (t³ − t) over tie groups
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && pooled[j].0 == pooled[i].0 {
            j += 1;
        }
        let t = (j - i) as f64;
        // Ranks are 1-based; tied values share the group's mean rank.
        let midrank = (i + j + 1) as f64 / 2.0;
        for item in &pooled[i..j] {
            if item.1 == 0 {
                rank_sum_x += midrank;
            }
        }
        tie_term += t * t * t - t;
        i = j;
    }

    let u1 = rank_sum_x - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;
    let u = u1.min(u2);

    let mean = (n1 * n2) as f64 / 2.0;
    let nf = n as f64;
    let var = (n1 * n2) as f64 / 12.0 * (nf + 1.0 - tie_term / (nf * (nf - 1.0)));

    let (z, p) = if var <= 0.0 {
        // All observations tied: no distributional difference detectable.
        (0.0, 1.0)
    } else {
        let z = ((u - mean).abs() - 0.5).max(0.0) / var.sqrt();
        let normal = Normal::new(0.0, 1.0)?;
        (z, (2.0 * (1.0 - normal.cdf(z))).min(1.0))
    };

    Ok(MannWhitney { u, z, p, n1, n2 })
}

/// One effect line of a two-way ANOVA.
#[derive(Debug, Clone, Copy)]
pub struct AnovaEffect {
    pub ss: f64,
    pub df: f64,
    pub f: f64,
    pub p: f64,
}

/// Two-way ANOVA over the condition × model design.
#[derive(Debug, Clone, Copy)]
pub struct TwoWayAnova {
    pub condition: AnovaEffect,
    pub model: AnovaEffect,
    pub interaction: AnovaEffect,
    pub ss_within: f64,
    pub df_within: f64,
}

/// Two-way factorial ANOVA over the 2×2 cells
/// `cells[condition][model]` (condition: 0 = control, 1 = treatment;
/// model: 0 = FE, 1 = VB).
///
/// Uses cell-size-weighted sums of squares, which reduce to the textbook
/// balanced formulas when all cells are equal after missing-value removal.
/// Errors if any cell is empty or there are no within-cell degrees of
/// freedom.
pub fn two_way_anova(cells: &[[&[f64]; 2]; 2]) -> Result<TwoWayAnova> {
    let mut n_total = 0usize;
    let mut grand_sum = 0.0_f64;
    for row in cells {
        for cell in row {
            ensure!(!cell.is_empty(), "empty ANOVA cell");
            ensure!(
                cell.iter().all(|v| !v.is_nan()),
                "NaN in ANOVA cell; filter missing values first"
            );
            n_total += cell.len();
            grand_sum += cell.iter().sum::<f64>();
        }
    }
    let grand_mean = grand_sum / n_total as f64;

    let cell_n = |i: usize, j: usize| cells[i][j].len() as f64;
    let cell_mean =
        |i: usize, j: usize| cells[i][j].iter().sum::<f64>() / cell_n(i, j);

    // Marginal means, weighted by cell size.
    let row_n = |i: usize| cell_n(i, 0) + cell_n(i, 1);
    let col_n = |j: usize| cell_n(0, j) + cell_n(1, j);
    let row_mean = |i: usize| {
        (cell_n(i, 0) * cell_mean(i, 0) + cell_n(i, 1) * cell_mean(i, 1)) / row_n(i)
    };
    let col_mean = |j: usize| {
        (cell_n(0, j) * cell_mean(0, j) + cell_n(1, j) * cell_mean(1, j)) / col_n(j)
    };

    let ss_condition: f64 = (0..2)
        .map(|i| row_n(i) * (row_mean(i) - grand_mean).powi(2))
        .sum();
    let ss_model: f64 = (0..2)
        .map(|j| col_n(j) * (col_mean(j) - grand_mean).powi(2))
        .sum();

    let mut ss_cells = 0.0_f64;
    let mut ss_within = 0.0_f64;
    for i in 0..2 {
        for j in 0..2 {
            let m = cell_mean(i, j);
            ss_cells += cell_n(i, j) * (m - grand_mean).powi(2);
            ss_within += cells[i][j].iter().map(|&v| (v - m).powi(2)).sum::<f64>();
        }
    }
    let ss_interaction = (ss_cells - ss_condition - ss_model).max(0.0);

    let df_within = (n_total - 4) as f64;
    ensure!(df_within > 0.0, "no within-cell degrees of freedom");
    let ms_within = ss_within / df_within;

    let effect = |ss: f64, df: f64| -> Result<AnovaEffect> {
        let (f, p) = if ms_within > 0.0 {
            let f = (ss / df) / ms_within;
            let dist = FisherSnedecor::new(df, df_within)?;
            (f, 1.0 - dist.cdf(f))
        } else {
            // Zero residual variance: any nonzero effect is exact.
            (f64::INFINITY, if ss > 0.0 { 0.0 } else { 1.0 })
        };
        Ok(AnovaEffect { ss, df, f, p })
    };

    Ok(TwoWayAnova {
        condition: effect(ss_condition, 1.0)?,
        model: effect(ss_model, 1.0)?,
        interaction: effect(ss_interaction, 1.0)?,
        ss_within,
        df_within,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_samples_give_p_one() {
        let a = [0.1, 0.4, -0.2, 0.9, 0.3];
        let r = mann_whitney_u(&a, &a).unwrap();
        approx::assert_abs_diff_eq!(r.z, 0.0);
        approx::assert_abs_diff_eq!(r.p, 1.0);
    }

    #[test]
    fn disjoint_samples_give_extreme_u() {
        let lo = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let hi = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0];
        let r = mann_whitney_u(&lo, &hi).unwrap();
        approx::assert_abs_diff_eq!(r.u, 0.0);
        assert!(r.p < 0.01, "p = {}", r.p);
    }

    #[test]
    fn u_statistic_matches_hand_computation() {
        // Pooled ranks for xs are {1,2,3}: R1 = 6, U1 = 6 − 3·4/2 = 0,
        // U2 = n1·n2 − U1 = 6, so U = 0.
        let xs = [1.0, 2.0, 3.0];
        let ys = [4.0, 5.0];
        let r = mann_whitney_u(&xs, &ys).unwrap();
        approx::assert_abs_diff_eq!(r.u, 0.0);
    }

    #[test]
    fn rejects_nan_input() {
        assert!(mann_whitney_u(&[1.0, f64::NAN], &[2.0]).is_err());
    }

    #[test]
    fn anova_detects_condition_effect() {
        // Control cells well below treatment cells, no model effect.
        let c_fe = [1.0, 1.1, 0.9, 1.0, 1.05];
        let c_vb = [1.0, 0.95, 1.1, 1.0, 0.9];
        let t_fe = [3.0, 3.1, 2.9, 3.0, 3.05];
        let t_vb = [3.0, 2.95, 3.1, 3.0, 2.9];
        let r = two_way_anova(&[[&c_fe, &c_vb], [&t_fe, &t_vb]]).unwrap();
        assert!(r.condition.p < 0.001, "condition p = {}", r.condition.p);
        assert!(r.model.p > 0.3, "model p = {}", r.model.p);
    }

    #[test]
    fn anova_no_effect_when_cells_identical() {
        let cell = [0.2, -0.1, 0.5, 0.0, 0.3, -0.2];
        let r = two_way_anova(&[[&cell, &cell], [&cell, &cell]]).unwrap();
        approx::assert_abs_diff_eq!(r.condition.ss, 0.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(r.model.ss, 0.0, epsilon = 1e-12);
        assert!(r.condition.p > 0.99);
    }

    #[test]
    fn anova_sums_of_squares_partition() {
        let c_fe = [1.0, 2.0, 3.0];
        let c_vb = [2.0, 3.0, 4.0];
        let t_fe = [0.5, 1.5, 2.5];
        let t_vb = [5.0, 6.0, 7.0];
        let cells = [[&c_fe[..], &c_vb[..]], [&t_fe[..], &t_vb[..]]];
        let r = two_way_anova(&cells).unwrap();

        let all: Vec<f64> = cells
            .iter()
            .flat_map(|row| row.iter().flat_map(|c| c.iter().copied()))
            .collect();
        let gm = all.iter().sum::<f64>() / all.len() as f64;
        let ss_total: f64 = all.iter().map(|v| (v - gm).powi(2)).sum();

        let partitioned =
            r.condition.ss + r.model.ss + r.interaction.ss + r.ss_within;
        approx::assert_abs_diff_eq!(partitioned, ss_total, epsilon = 1e-9);
    }
}
