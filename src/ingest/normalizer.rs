//! Raw row → [`Meta`] normalization.

use super::headers;
use super::resolver::{resolve, resolve_integer, resolve_number, resolve_text};
use super::{RawRow, RawValue};
use crate::models::{Evaluacion, Meta, MetaId, SIN_PROGRAMA};

/// Normalize every row, preserving order. No row is ever dropped.
pub fn normalize_rows(rows: &[RawRow]) -> Vec<Meta> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| normalize_row(row, index))
        .collect()
}

/// Normalize one row. `index` is the 0-based position of the row in the
/// sheet, used for the id when no id column resolves.
pub fn normalize_row(row: &RawRow, index: usize) -> Meta {
    let t1_plan = resolve_number(row, headers::T1_PLAN);
    let t1_ejec = resolve_number(row, headers::T1_EJEC);
    let t2_plan = resolve_number(row, headers::T2_PLAN);
    let t2_ejec = resolve_number(row, headers::T2_EJEC);
    let t3_plan = resolve_number(row, headers::T3_PLAN);
    let t3_ejec = resolve_number(row, headers::T3_EJEC);
    let t4_plan = resolve_number(row, headers::T4_PLAN);
    let t4_ejec = resolve_number(row, headers::T4_EJEC);

    let total_plan = explicit_or(
        resolve_number(row, headers::TOTAL_PLAN),
        t1_plan + t2_plan + t3_plan + t4_plan,
    );
    let total_ejec = explicit_or(
        resolve_number(row, headers::TOTAL_EJEC),
        t1_ejec + t2_ejec + t3_ejec + t4_ejec,
    );

    let avance = final_avance(
        resolve_number(row, headers::AVANCE),
        total_plan,
        total_ejec,
    );

    let programa = match resolve_text(row, headers::PROGRAMA) {
        p if p.is_empty() => SIN_PROGRAMA.to_string(),
        p => p,
    };

    Meta {
        id: resolve_id(row, index),
        eje: resolve_text(row, headers::EJE).trim().to_string(),
        sector_programa: resolve_text(row, headers::SECTOR_PROGRAMA),
        nombre_sector_programa: resolve_text(row, headers::NOMBRE_SECTOR_PROGRAMA),
        objetivo_meta: resolve_text(row, headers::OBJETIVO_META),
        meta_programa: resolve_text(row, headers::META_PROGRAMA),
        n_indicador: resolve_text(row, headers::N_INDICADOR),
        linea_base: resolve_number(row, headers::LINEA_BASE),
        ejecutado2024: resolve_number(row, headers::EJECUTADO_2024),
        esperado2027: resolve_number(row, headers::ESPERADO_2027),
        dependencia_responsable: resolve_text(row, headers::DEPENDENCIA_RESPONSABLE),
        n_metas_proyecto: resolve_integer(row, headers::N_METAS_PROYECTO),
        n_metas_protect: resolve_integer(row, headers::N_METAS_PROTECT),
        numero_meta: resolve_text(row, headers::NUMERO_META),
        nombre: resolve_text(row, headers::NOMBRE),
        meta_producto: resolve_text(row, headers::META_PRODUCTO),
        indicador_producto: resolve_text(row, headers::INDICADOR_PRODUCTO),
        linea_base2023: resolve_number(row, headers::LINEA_BASE_2023),
        codigo_dane: resolve_text(row, headers::CODIGO_DANE),
        codigo_ccpet: resolve_text(row, headers::CODIGO_CCPET),
        indicador: resolve_text(row, headers::INDICADOR),
        t1_plan,
        t1_ejec,
        t2_plan,
        t2_ejec,
        t3_plan,
        t3_ejec,
        t4_plan,
        t4_ejec,
        total_plan,
        total_ejec,
        avance,
        avance_estado: resolve_number(row, headers::AVANCE_ESTADO),
        programa,
        estado_proyecto: resolve_text(row, headers::ESTADO_PROYECTO),
        evaluacion: Evaluacion::from_avance(avance),
    }
}

/// An explicit spreadsheet total wins only when nonzero; an explicit zero
/// falls back to the computed quarterly sum.
fn explicit_or(explicit: f64, computed: f64) -> f64 {
    if explicit != 0.0 {
        explicit
    } else {
        computed
    }
}

/// Final advance percentage in [0, 100].
///
/// An explicit value in (0, 1] is a fraction and is scaled by 100. Anything
/// outside [0, 100] is reset to 0, not clamped. A zero explicit value is
/// replaced by executed/planned.
pub fn final_avance(explicit: f64, total_plan: f64, total_ejec: f64) -> f64 {
    let mut avance = explicit;
    if avance > 0.0 && avance <= 1.0 {
        avance *= 100.0;
    }
    avance = reset_out_of_range(avance);

    if avance == 0.0 && total_plan > 0.0 {
        avance = reset_out_of_range(total_ejec / total_plan * 100.0);
    }
    avance
}

fn reset_out_of_range(avance: f64) -> f64 {
    if (0.0..=100.0).contains(&avance) {
        avance
    } else {
        0.0
    }
}

fn resolve_id(row: &RawRow, index: usize) -> MetaId {
    match resolve(row, headers::ID) {
        Some(RawValue::Number(n)) if n.fract() == 0.0 && n.abs() < 1e15 => MetaId::Int(*n as i64),
        Some(RawValue::Number(n)) => MetaId::Number(*n),
        Some(RawValue::Text(s)) => MetaId::Text(s.clone()),
        Some(RawValue::Bool(b)) => MetaId::Text(b.to_string()),
        None => MetaId::Int(index as i64 + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::test_support::row;

    fn quarters(values: [f64; 8]) -> RawRow {
        row(&[
            ("T1_PLANEADO", values[0]),
            ("T1_EJECUTADO", values[1]),
            ("T2_PLANEADO", values[2]),
            ("T2_EJECUTADO", values[3]),
            ("T3_PLANEADO", values[4]),
            ("T3_EJECUTADO", values[5]),
            ("T4_PLANEADO", values[6]),
            ("T4_EJECUTADO", values[7]),
        ])
    }

    #[test]
    fn test_totals_are_quarterly_sums_without_total_columns() {
        let r = quarters([10.0, 5.0, 20.0, 10.0, 30.0, 0.0, 40.0, 25.0]);
        let meta = normalize_row(&r, 0);
        assert_eq!(meta.total_plan, meta.t1_plan + meta.t2_plan + meta.t3_plan + meta.t4_plan);
        assert_eq!(meta.total_plan, 100.0);
        assert_eq!(meta.total_ejec, 40.0);
        assert_eq!(meta.avance, 40.0);
        assert_eq!(meta.evaluacion, Evaluacion::AvanceBajo);
    }

    #[test]
    fn test_explicit_total_wins_when_nonzero() {
        let mut r = quarters([10.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        r.insert("TOTAL PLANEADO 2025".into(), RawValue::Number(50.0));
        let meta = normalize_row(&r, 0);
        assert_eq!(meta.total_plan, 50.0);
        assert_eq!(meta.total_ejec, 5.0);

        r.insert("TOTAL EJECUTADO".into(), RawValue::Number(25.0));
        let meta = normalize_row(&r, 0);
        assert_eq!(meta.total_plan, 50.0);
        assert_eq!(meta.total_ejec, 25.0);
        assert_eq!(meta.avance, 50.0);
    }

    #[test]
    fn test_explicit_zero_executed_total_falls_back_to_sum() {
        let mut r = quarters([10.0, 5.0, 10.0, 3.0, 0.0, 0.0, 0.0, 0.0]);
        r.insert("TOTAL EJECUTADO 2025".into(), RawValue::Number(0.0));
        r.insert("TOTAL PLANEADO".into(), RawValue::from("0"));
        let meta = normalize_row(&r, 0);
        assert_eq!(meta.total_ejec, 8.0);
        assert_eq!(meta.total_plan, 20.0);
        assert_eq!(meta.avance, 40.0);
    }

    #[test]
    fn test_explicit_zero_total_falls_back_to_sum() {
        let mut r = quarters([10.0, 5.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        r.insert("TOTAL PLANEADO".into(), RawValue::Number(0.0));
        let meta = normalize_row(&r, 0);
        assert_eq!(meta.total_plan, 20.0);
    }

    #[test]
    fn test_fraction_avance_is_rescaled() {
        let r = row(&[("AVANCE 2025", 0.85)]);
        let meta = normalize_row(&r, 0);
        assert!((meta.avance - 85.0).abs() < 1e-9);
        assert_eq!(meta.evaluacion, Evaluacion::AvanceMedio);

        let r = row(&[("% AVANCE", 1.0)]);
        assert_eq!(normalize_row(&r, 0).avance, 100.0);
    }

    #[test]
    fn test_out_of_range_avance_resets_to_zero() {
        let r = row(&[("AVANCE", 150.0)]);
        let meta = normalize_row(&r, 0);
        assert_eq!(meta.avance, 0.0);
        assert_eq!(meta.evaluacion, Evaluacion::SinProgramacion);

        let r = row(&[("AVANCE", -5.0)]);
        assert_eq!(normalize_row(&r, 0).avance, 0.0);
    }

    #[test]
    fn test_out_of_range_explicit_falls_back_to_ratio() {
        let mut r = quarters([10.0, 9.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        r.insert("AVANCE 2025".into(), RawValue::Number(250.0));
        let meta = normalize_row(&r, 0);
        assert_eq!(meta.avance, 95.0);
        assert_eq!(meta.evaluacion, Evaluacion::AvanceAlto);
    }

    #[test]
    fn test_explicit_percentage_kept() {
        let r = row(&[("% TOTAL AVANCE 2025", "72")]);
        let meta = normalize_row(&r, 0);
        assert_eq!(meta.avance, 72.0);
        assert_eq!(meta.evaluacion, Evaluacion::AvanceMedio);
    }

    #[test]
    fn test_derived_avance_over_execution_is_reset() {
        let r = quarters([10.0, 30.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let meta = normalize_row(&r, 0);
        assert_eq!(meta.avance, 0.0);
    }

    #[test]
    fn test_avance_always_in_range() {
        let cases: Vec<RawRow> = vec![
            row(&[("AVANCE", "abc")]),
            row(&[("AVANCE", 1e9)]),
            row(&[("AVANCE", -0.5)]),
            quarters([-10.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            quarters([10.0, -5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            row(&[("AVANCE", 0.0001)]),
        ];
        for r in &cases {
            let meta = normalize_row(r, 0);
            assert!((0.0..=100.0).contains(&meta.avance), "avance {}", meta.avance);
        }
    }

    #[test]
    fn test_row_without_recognized_headers() {
        let r = row(&[("COLUMNA DESCONOCIDA", "x")]);
        let meta = normalize_row(&r, 4);
        assert_eq!(meta.id, MetaId::Int(5));
        assert_eq!(meta.programa, SIN_PROGRAMA);
        assert_eq!(meta.evaluacion, Evaluacion::SinProgramacion);
        assert_eq!(meta.avance, 0.0);
        assert_eq!(meta.total_plan, 0.0);
        assert_eq!(meta.total_ejec, 0.0);
        assert_eq!(meta.t3_ejec, 0.0);
        assert_eq!(meta.linea_base, 0.0);
        assert_eq!(meta.n_metas_proyecto, 0);
        assert_eq!(meta.indicador, "");
    }

    #[test]
    fn test_text_fields_and_id() {
        let r = row(&[
            ("No", RawValue::Number(17.0)),
            ("   EJE", RawValue::from("  Eje Social  ")),
            ("NOMBRE DEL PROGRAMA", RawValue::from("Salud")),
            ("INDICADOR", RawValue::from("Cobertura")),
            ("CODIGO DANE", RawValue::Number(5001.0)),
            ("DEPENDENCIA", RawValue::from("Secretaría de Salud")),
        ]);
        let meta = normalize_row(&r, 0);
        assert_eq!(meta.id, MetaId::Int(17));
        assert_eq!(meta.eje, "Eje Social");
        assert_eq!(meta.programa, "Salud");
        assert_eq!(meta.nombre_sector_programa, "Salud");
        assert_eq!(meta.indicador, "Cobertura");
        assert_eq!(meta.indicador_producto, "Cobertura");
        assert_eq!(meta.codigo_dane, "5001");
        assert_eq!(meta.dependencia_responsable, "Secretaría de Salud");
    }

    #[test]
    fn test_text_id_kept() {
        let r = row(&[("ID", "M-01")]);
        assert_eq!(normalize_row(&r, 3).id, MetaId::Text("M-01".into()));
    }

    #[test]
    fn test_normalize_rows_keeps_every_row() {
        let rows = vec![row::<f64>(&[]), row(&[("T1_Plan", 2.0)]), row::<f64>(&[])];
        let metas = normalize_rows(&rows);
        assert_eq!(metas.len(), 3);
        assert_eq!(metas[2].id, MetaId::Int(3));
    }

    #[test]
    fn test_final_avance() {
        assert_eq!(final_avance(0.0, 0.0, 10.0), 0.0);
        assert_eq!(final_avance(0.0, 50.0, 25.0), 50.0);
        assert_eq!(final_avance(45.0, 50.0, 25.0), 45.0);
    }
}
