//! Completion metrics aggregation.
//!
//! Two independent reductions over the normalized metas: one global,
//! one grouped by program. Both are total functions; an empty input
//! yields zeroed metrics.

use crate::models::{
    Evaluacion, EvaluationDistribution, GlobalMetrics, Meta, ProgramPerformance,
};

/// Running sums of the quarterly and total values.
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    plan: [f64; 4],
    ejec: [f64; 4],
    total_plan: f64,
    total_ejec: f64,
}

impl Totals {
    fn add(&mut self, meta: &Meta) {
        for (q, (plan, ejec)) in meta.quarters().into_iter().enumerate() {
            self.plan[q] += plan;
            self.ejec[q] += ejec;
        }
        self.total_plan += meta.total_plan;
        self.total_ejec += meta.total_ejec;
    }

    fn quarter_ratio(&self, q: usize) -> f64 {
        completion_ratio(self.ejec[q], self.plan[q])
    }

    fn total_ratio(&self) -> f64 {
        completion_ratio(self.total_ejec, self.total_plan)
    }
}

/// `ejec / plan * 100` rounded to one decimal, 0 when nothing was planned.
pub fn completion_ratio(ejec: f64, plan: f64) -> f64 {
    if plan > 0.0 {
        round_one_decimal(ejec / plan * 100.0)
    } else {
        0.0
    }
}

/// Round to one decimal on the exact binary value, so `1.45` (stored as
/// 1.4499…) gives 1.4. Exact ties such as `0.25` round away from zero.
fn round_one_decimal(value: f64) -> f64 {
    let scaled = value * 10.0;
    let exact_tie = (value * 4.0).fract() == 0.0 && scaled.fract().abs() == 0.5;
    if exact_tie || !value.is_finite() {
        return scaled.round() / 10.0;
    }
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Compute the global metrics over all metas.
pub fn global_metrics(metas: &[Meta]) -> GlobalMetrics {
    let mut totals = Totals::default();
    for meta in metas {
        totals.add(meta);
    }

    GlobalMetrics {
        cumplimiento_global: totals.total_ratio(),
        cumplimiento_t1: totals.quarter_ratio(0),
        cumplimiento_t2: totals.quarter_ratio(1),
        cumplimiento_t3: totals.quarter_ratio(2),
        cumplimiento_t4: totals.quarter_ratio(3),
        total_metas: metas.len(),
        total_plan: totals.total_plan,
        total_ejec: totals.total_ejec,
        total_t1_plan: totals.plan[0],
        total_t1_ejec: totals.ejec[0],
        total_t2_plan: totals.plan[1],
        total_t2_ejec: totals.ejec[1],
        total_t3_plan: totals.plan[2],
        total_t3_ejec: totals.ejec[2],
        total_t4_plan: totals.plan[3],
        total_t4_ejec: totals.ejec[3],
    }
}

/// Group metas by program and compute per-program metrics.
///
/// Programs appear in the order they are first encountered.
pub fn program_performance(metas: &[Meta]) -> ProgramPerformance {
    let mut performance = ProgramPerformance::new();

    for meta in metas {
        let program = performance.entry(meta.program_key());
        program.metas_count += 1;
        program.t1_plan += meta.t1_plan;
        program.t1_ejec += meta.t1_ejec;
        program.t2_plan += meta.t2_plan;
        program.t2_ejec += meta.t2_ejec;
        program.t3_plan += meta.t3_plan;
        program.t3_ejec += meta.t3_ejec;
        program.t4_plan += meta.t4_plan;
        program.t4_ejec += meta.t4_ejec;
        program.total_plan += meta.total_plan;
        program.total_ejec += meta.total_ejec;
    }

    for program in performance.values_mut() {
        program.t1_cumplimiento = completion_ratio(program.t1_ejec, program.t1_plan);
        program.t2_cumplimiento = completion_ratio(program.t2_ejec, program.t2_plan);
        program.t3_cumplimiento = completion_ratio(program.t3_ejec, program.t3_plan);
        program.t4_cumplimiento = completion_ratio(program.t4_ejec, program.t4_plan);
        program.total_cumplimiento = completion_ratio(program.total_ejec, program.total_plan);
    }

    performance
}

/// Count metas per evaluation tier.
pub fn evaluation_distribution<'a, I>(metas: I) -> EvaluationDistribution
where
    I: IntoIterator<Item = &'a Meta>,
{
    let mut dist = EvaluationDistribution::default();

    for meta in metas {
        match meta.evaluacion {
            Evaluacion::AvanceAlto => dist.alto += 1,
            Evaluacion::AvanceMedio => dist.medio += 1,
            Evaluacion::AvanceBajo => dist.bajo += 1,
            Evaluacion::SinProgramacion => dist.sin_programacion += 1,
        }
    }

    dist
}

/// Programs sorted by overall completion (highest first), ties broken by
/// planned total.
pub fn ranked_programs(performance: &ProgramPerformance) -> Vec<(&str, f64)> {
    let mut ranked: Vec<_> = performance
        .iter()
        .map(|(name, m)| (name, m.total_cumplimiento, m.total_plan))
        .collect();

    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal))
    });

    ranked.into_iter().map(|(name, pct, _)| (name, pct)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::normalize_row;
    use crate::ingest::test_support::row;
    use crate::ingest::RawValue;
    use crate::models::SIN_PROGRAMA;

    fn create_test_meta(programa: &str, plan: [f64; 4], ejec: [f64; 4]) -> Meta {
        let mut r = row(&[
            ("T1_Plan", plan[0]),
            ("T2_Plan", plan[1]),
            ("T3_Plan", plan[2]),
            ("T4_Plan", plan[3]),
            ("T1_Ejec", ejec[0]),
            ("T2_Ejec", ejec[1]),
            ("T3_Ejec", ejec[2]),
            ("T4_Ejec", ejec[3]),
        ]);
        if !programa.is_empty() {
            r.insert("PROGRAMA".into(), RawValue::from(programa));
        }
        normalize_row(&r, 0)
    }

    fn sample() -> Vec<Meta> {
        vec![
            create_test_meta("Salud", [10.0, 10.0, 0.0, 0.0], [10.0, 5.0, 0.0, 0.0]),
            create_test_meta("Educación", [0.0, 20.0, 20.0, 0.0], [0.0, 20.0, 10.0, 0.0]),
            create_test_meta("Salud", [5.0, 0.0, 0.0, 5.0], [0.0, 0.0, 0.0, 5.0]),
            create_test_meta("", [3.0, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]),
        ]
    }

    #[test]
    fn test_global_metrics() {
        let metrics = global_metrics(&sample());

        assert_eq!(metrics.total_metas, 4);
        assert_eq!(metrics.total_t1_plan, 18.0);
        assert_eq!(metrics.total_t1_ejec, 11.0);
        assert_eq!(metrics.total_plan, 73.0);
        assert_eq!(metrics.total_ejec, 51.0);
        assert_eq!(metrics.cumplimiento_t1, 61.1);
        assert_eq!(metrics.cumplimiento_t2, 83.3);
        assert_eq!(metrics.cumplimiento_t3, 50.0);
        assert_eq!(metrics.cumplimiento_t4, 100.0);
        assert_eq!(metrics.cumplimiento_global, 69.9);
    }

    #[test]
    fn test_zero_denominator_ratio_is_zero() {
        let metas = vec![create_test_meta("X", [0.0; 4], [5.0, 0.0, 0.0, 0.0])];
        let metrics = global_metrics(&metas);
        assert_eq!(metrics.cumplimiento_t1, 0.0);
        assert_eq!(metrics.cumplimiento_global, 0.0);
        assert!(!metrics.cumplimiento_t2.is_nan());
    }

    #[test]
    fn test_rounding_follows_exact_binary_value() {
        assert_eq!(round_one_decimal(1.45), 1.4);
        assert_eq!(round_one_decimal(0.35), 0.3);
        assert_eq!(round_one_decimal(0.25), 0.3);
        assert_eq!(round_one_decimal(0.75), 0.8);
        assert_eq!(round_one_decimal(2.0), 2.0);
        assert_eq!(completion_ratio(2.0, 3.0), 66.7);
    }

    #[test]
    fn test_program_performance() {
        let perf = program_performance(&sample());

        assert_eq!(perf.len(), 3);
        let keys: Vec<&str> = perf.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Salud", "Educación", SIN_PROGRAMA]);

        let salud = perf.get("Salud").unwrap();
        assert_eq!(salud.metas_count, 2);
        assert_eq!(salud.t1_plan, 15.0);
        assert_eq!(salud.t1_ejec, 10.0);
        assert_eq!(salud.t1_cumplimiento, 66.7);
        assert_eq!(salud.t4_cumplimiento, 100.0);
        assert_eq!(salud.t3_cumplimiento, 0.0);
        assert_eq!(salud.total_plan, 30.0);
        assert_eq!(salud.total_cumplimiento, 66.7);
    }

    #[test]
    fn test_program_partition_matches_global_total() {
        let metas = sample();
        let global = global_metrics(&metas);
        let perf = program_performance(&metas);

        let plan_sum: f64 = perf.iter().map(|(_, m)| m.total_plan).sum();
        let ejec_sum: f64 = perf.iter().map(|(_, m)| m.total_ejec).sum();
        let count_sum: usize = perf.iter().map(|(_, m)| m.metas_count).sum();

        assert!((plan_sum - global.total_plan).abs() < 1e-9);
        assert!((ejec_sum - global.total_ejec).abs() < 1e-9);
        assert_eq!(count_sum, global.total_metas);
    }

    #[test]
    fn test_order_does_not_change_totals() {
        let metas = sample();
        let mut reversed = metas.clone();
        reversed.reverse();
        assert_eq!(global_metrics(&metas), global_metrics(&reversed));
    }

    #[test]
    fn test_empty_input() {
        let metrics = global_metrics(&[]);
        assert_eq!(metrics, GlobalMetrics::default());
        assert_eq!(metrics.total_metas, 0);
        assert!(program_performance(&[]).is_empty());
        assert_eq!(evaluation_distribution(&Vec::<Meta>::new()).total(), 0);
    }

    #[test]
    fn test_evaluation_distribution() {
        let dist = evaluation_distribution(&sample());
        // 75%, 75%, 50%, 33.3%
        assert_eq!(dist.medio, 2);
        assert_eq!(dist.bajo, 2);
        assert_eq!(dist.alto, 0);
        assert_eq!(dist.total(), 4);
    }

    #[test]
    fn test_ranked_programs() {
        let perf = program_performance(&sample());
        let ranked = ranked_programs(&perf);
        assert_eq!(ranked[0].0, "Educación");
        assert_eq!(ranked.last().map(|r| r.0), Some(SIN_PROGRAMA));
    }
}
