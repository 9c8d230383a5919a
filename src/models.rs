//! Data models for the development-plan dashboard.
//!
//! This module contains the canonical record shape produced from each
//! spreadsheet row, and the aggregate structures computed from them.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Program key used when a row carries no program name.
pub const SIN_PROGRAMA: &str = "Sin Programa";

/// Evaluation tier of a meta, derived from its final `avance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Evaluacion {
    /// `avance` >= 90
    #[serde(rename = "Avance Alto")]
    AvanceAlto,
    /// 70 <= `avance` < 90
    #[serde(rename = "Avance Medio")]
    AvanceMedio,
    /// 0 < `avance` < 70
    #[serde(rename = "Avance Bajo")]
    AvanceBajo,
    /// `avance` == 0
    #[serde(rename = "Sin Programación")]
    SinProgramacion,
}

impl Evaluacion {
    /// All tiers, highest first.
    pub const ALL: [Evaluacion; 4] = [
        Evaluacion::AvanceAlto,
        Evaluacion::AvanceMedio,
        Evaluacion::AvanceBajo,
        Evaluacion::SinProgramacion,
    ];

    /// Tier for a final advance percentage. First match wins, checked
    /// from the highest tier down.
    pub fn from_avance(avance: f64) -> Self {
        if avance >= 90.0 {
            Evaluacion::AvanceAlto
        } else if avance >= 70.0 {
            Evaluacion::AvanceMedio
        } else if avance > 0.0 {
            Evaluacion::AvanceBajo
        } else {
            Evaluacion::SinProgramacion
        }
    }

    /// Label as shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Evaluacion::AvanceAlto => "Avance Alto",
            Evaluacion::AvanceMedio => "Avance Medio",
            Evaluacion::AvanceBajo => "Avance Bajo",
            Evaluacion::SinProgramacion => "Sin Programación",
        }
    }

    /// Returns an emoji representation of the tier.
    pub fn emoji(&self) -> &'static str {
        match self {
            Evaluacion::AvanceAlto => "🟢",
            Evaluacion::AvanceMedio => "🟡",
            Evaluacion::AvanceBajo => "🔴",
            Evaluacion::SinProgramacion => "⚪",
        }
    }

    /// Parse a dashboard label back into a tier.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.label() == label)
    }
}

impl fmt::Display for Evaluacion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Identifier of a meta: whatever the source's id column holds, or the
/// 1-based row position when it holds nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaId {
    Int(i64),
    Number(f64),
    Text(String),
}

impl fmt::Display for MetaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaId::Int(n) => write!(f, "{}", n),
            MetaId::Number(n) => write!(f, "{}", n),
            MetaId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One development-plan target, normalized from one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub id: MetaId,
    pub eje: String,
    pub sector_programa: String,
    pub nombre_sector_programa: String,
    pub objetivo_meta: String,
    pub meta_programa: String,
    pub n_indicador: String,
    pub linea_base: f64,
    pub ejecutado2024: f64,
    pub esperado2027: f64,
    pub dependencia_responsable: String,
    pub n_metas_proyecto: i64,
    pub n_metas_protect: i64,
    pub numero_meta: String,
    pub nombre: String,
    pub meta_producto: String,
    pub indicador_producto: String,
    pub linea_base2023: f64,
    pub codigo_dane: String,
    pub codigo_ccpet: String,
    pub indicador: String,
    #[serde(rename = "t1_plan")]
    pub t1_plan: f64,
    #[serde(rename = "t1_ejec")]
    pub t1_ejec: f64,
    #[serde(rename = "t2_plan")]
    pub t2_plan: f64,
    #[serde(rename = "t2_ejec")]
    pub t2_ejec: f64,
    #[serde(rename = "t3_plan")]
    pub t3_plan: f64,
    #[serde(rename = "t3_ejec")]
    pub t3_ejec: f64,
    #[serde(rename = "t4_plan")]
    pub t4_plan: f64,
    #[serde(rename = "t4_ejec")]
    pub t4_ejec: f64,
    pub total_plan: f64,
    pub total_ejec: f64,
    /// Final advance percentage, always within [0, 100].
    pub avance: f64,
    pub avance_estado: f64,
    pub programa: String,
    pub estado_proyecto: String,
    pub evaluacion: Evaluacion,
}

impl Meta {
    /// Quarterly `(plan, ejec)` pairs, T1 first.
    pub fn quarters(&self) -> [(f64, f64); 4] {
        [
            (self.t1_plan, self.t1_ejec),
            (self.t2_plan, self.t2_ejec),
            (self.t3_plan, self.t3_ejec),
            (self.t4_plan, self.t4_ejec),
        ]
    }

    /// Program key used for grouping.
    pub fn program_key(&self) -> &str {
        if self.programa.is_empty() {
            SIN_PROGRAMA
        } else {
            &self.programa
        }
    }
}

/// Completion totals across every meta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalMetrics {
    pub cumplimiento_global: f64,
    pub cumplimiento_t1: f64,
    pub cumplimiento_t2: f64,
    pub cumplimiento_t3: f64,
    pub cumplimiento_t4: f64,
    pub total_metas: usize,
    pub total_plan: f64,
    pub total_ejec: f64,
    pub total_t1_plan: f64,
    pub total_t1_ejec: f64,
    pub total_t2_plan: f64,
    pub total_t2_ejec: f64,
    pub total_t3_plan: f64,
    pub total_t3_ejec: f64,
    pub total_t4_plan: f64,
    pub total_t4_ejec: f64,
}

/// Completion totals for one program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramMetrics {
    pub metas_count: usize,
    pub t1_plan: f64,
    pub t1_ejec: f64,
    pub t2_plan: f64,
    pub t2_ejec: f64,
    pub t3_plan: f64,
    pub t3_ejec: f64,
    pub t4_plan: f64,
    pub t4_ejec: f64,
    pub total_plan: f64,
    pub total_ejec: f64,
    pub t1_cumplimiento: f64,
    pub t2_cumplimiento: f64,
    pub t3_cumplimiento: f64,
    pub t4_cumplimiento: f64,
    pub total_cumplimiento: f64,
}

/// Per-program metrics keyed by program name, kept in first-encounter order.
///
/// Serializes as a JSON object whose keys follow that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramPerformance {
    entries: Vec<(String, ProgramMetrics)>,
    index: HashMap<String, usize>,
}

impl ProgramPerformance {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics for a program, if present.
    pub fn get(&self, programa: &str) -> Option<&ProgramMetrics> {
        self.index.get(programa).map(|&i| &self.entries[i].1)
    }

    /// Metrics for a program, inserting a zeroed record on first encounter.
    pub fn entry(&mut self, programa: &str) -> &mut ProgramMetrics {
        let i = match self.index.get(programa) {
            Some(&i) => i,
            None => {
                self.entries
                    .push((programa.to_string(), ProgramMetrics::default()));
                let i = self.entries.len() - 1;
                self.index.insert(programa.to_string(), i);
                i
            }
        };
        &mut self.entries[i].1
    }

    /// Iterate programs in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProgramMetrics)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Mutable iteration in first-encounter order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut ProgramMetrics> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ProgramPerformance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (programa, metrics) in &self.entries {
            map.serialize_entry(programa, metrics)?;
        }
        map.end()
    }
}

/// Number of metas in each evaluation tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationDistribution {
    #[serde(rename = "Avance Alto")]
    pub alto: usize,
    #[serde(rename = "Avance Medio")]
    pub medio: usize,
    #[serde(rename = "Avance Bajo")]
    pub bajo: usize,
    #[serde(rename = "Sin Programación")]
    pub sin_programacion: usize,
}

impl EvaluationDistribution {
    /// Count for a single tier.
    pub fn count(&self, tier: Evaluacion) -> usize {
        match tier {
            Evaluacion::AvanceAlto => self.alto,
            Evaluacion::AvanceMedio => self.medio,
            Evaluacion::AvanceBajo => self.bajo,
            Evaluacion::SinProgramacion => self.sin_programacion,
        }
    }

    pub fn total(&self) -> usize {
        self.alto + self.medio + self.bajo + self.sin_programacion
    }
}

/// Metadata about a cached snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Number of metas in the snapshot.
    pub total_metas: usize,
    /// When the snapshot was built (not when the source was modified).
    pub last_updated: DateTime<Utc>,
    /// Source file name.
    pub source: String,
}

/// The complete cached result of one ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub metas: Vec<Meta>,
    pub global_metrics: GlobalMetrics,
    pub program_performance: ProgramPerformance,
    pub metadata: Metadata,
}
