//! Summary report generation.
//!
//! This module renders a cached [`Dataset`] as a Markdown or JSON
//! completion report.

use crate::analysis::{evaluation_distribution, ranked_programs};
use crate::cli::OutputFormat;
use crate::ingest::resolver::format_number;
use crate::models::{
    Dataset, Evaluacion, EvaluationDistribution, GlobalMetrics, Meta, Metadata,
    ProgramPerformance,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(dataset: &Dataset, top_programs: usize) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# PlanMetas Report\n\n");

    output.push_str(&generate_metadata_section(&dataset.metadata));
    output.push_str(&generate_table_of_contents());
    output.push_str(&generate_summary_section(
        &dataset.global_metrics,
        &evaluation_distribution(&dataset.metas),
    ));
    output.push_str(&generate_quarters_section(&dataset.global_metrics));
    output.push_str(&generate_programs_section(
        &dataset.program_performance,
        top_programs,
    ));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &Metadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Snapshot Date:** {}\n",
        metadata.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Total Metas:** {}\n", metadata.total_metas));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents() -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Summary](#summary)\n");
    toc.push_str("- [Quarterly Completion](#quarterly-completion)\n");
    toc.push_str("- [Programs](#programs)\n");
    toc.push('\n');

    toc
}

/// Generate the summary section.
fn generate_summary_section(metrics: &GlobalMetrics, dist: &EvaluationDistribution) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str(&format!(
        "**Global completion:** {}% ({} executed of {} planned)\n\n",
        metrics.cumplimiento_global,
        format_number(metrics.total_ejec),
        format_number(metrics.total_plan)
    ));

    section.push_str("### Evaluation Breakdown\n\n");
    let headers: Vec<String> = Evaluacion::ALL
        .iter()
        .map(|tier| format!("{} {}", tier.emoji(), tier.label()))
        .collect();
    section.push_str(&format!("| {} | **Total** |\n", headers.join(" | ")));
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    let counts: Vec<String> = Evaluacion::ALL
        .iter()
        .map(|tier| dist.count(*tier).to_string())
        .collect();
    section.push_str(&format!(
        "| {} | **{}** |\n\n",
        counts.join(" | "),
        dist.total()
    ));

    section
}

/// Generate the quarterly completion table.
fn generate_quarters_section(metrics: &GlobalMetrics) -> String {
    let mut section = String::new();

    section.push_str("## Quarterly Completion\n\n");
    section.push_str("| Quarter | Planned | Executed | Completion |\n");
    section.push_str("|:---|---:|---:|---:|\n");

    let rows = [
        ("T1", metrics.total_t1_plan, metrics.total_t1_ejec, metrics.cumplimiento_t1),
        ("T2", metrics.total_t2_plan, metrics.total_t2_ejec, metrics.cumplimiento_t2),
        ("T3", metrics.total_t3_plan, metrics.total_t3_ejec, metrics.cumplimiento_t3),
        ("T4", metrics.total_t4_plan, metrics.total_t4_ejec, metrics.cumplimiento_t4),
    ];
    for (quarter, plan, ejec, pct) in rows {
        section.push_str(&format!(
            "| {} | {} | {} | {}% |\n",
            quarter,
            format_number(plan),
            format_number(ejec),
            pct
        ));
    }
    section.push_str(&format!(
        "| **Total** | **{}** | **{}** | **{}%** |\n\n",
        format_number(metrics.total_plan),
        format_number(metrics.total_ejec),
        metrics.cumplimiento_global
    ));

    section
}

/// Generate the program ranking.
fn generate_programs_section(performance: &ProgramPerformance, top: usize) -> String {
    let mut section = String::new();

    section.push_str("## Programs\n\n");

    if performance.is_empty() {
        section.push_str("No metas were found in the source.\n\n");
        return section;
    }

    let ranked = ranked_programs(performance);
    if ranked.len() > top {
        section.push_str(&format!(
            "Top {} of {} programs by completion.\n\n",
            top,
            ranked.len()
        ));
    }

    section.push_str("| Program | Metas | Planned | Executed | Completion |\n");
    section.push_str("|:---|:---:|---:|---:|---:|\n");

    for (name, pct) in ranked.into_iter().take(top) {
        if let Some(program) = performance.get(name) {
            section.push_str(&format!(
                "| {} | {} | {} | {} | {}% |\n",
                name,
                program.metas_count,
                format_number(program.total_plan),
                format_number(program.total_ejec),
                pct
            ));
        }
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by PlanMetas v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Everything the JSON report carries.
#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a Metadata,
    global_metrics: &'a GlobalMetrics,
    program_performance: &'a ProgramPerformance,
    evaluations: EvaluationDistribution,
    metas: &'a [Meta],
}

/// Generate a JSON report.
pub fn generate_json_report(dataset: &Dataset) -> Result<String> {
    let report = JsonReport {
        metadata: &dataset.metadata,
        global_metrics: &dataset.global_metrics,
        program_performance: &dataset.program_performance,
        evaluations: evaluation_distribution(&dataset.metas),
        metas: &dataset.metas,
    };
    serde_json::to_string_pretty(&report).map_err(Into::into)
}

/// Render the report in `format` and write it to `path`.
pub fn write_report(
    dataset: &Dataset,
    path: &Path,
    format: OutputFormat,
    top_programs: usize,
) -> Result<()> {
    let content = match format {
        OutputFormat::Json => generate_json_report(dataset)?,
        OutputFormat::Markdown => generate_markdown_report(dataset, top_programs),
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{global_metrics, program_performance};
    use crate::ingest::test_support::row;
    use crate::ingest::{normalize_rows, RawValue};
    use chrono::Utc;

    fn create_test_dataset() -> Dataset {
        let rows = vec![
            row(&[
                ("PROGRAMA", RawValue::from("Salud")),
                ("T1_Plan", RawValue::from(10.0)),
                ("T1_Ejec", RawValue::from(9.5)),
            ]),
            row(&[
                ("PROGRAMA", RawValue::from("Vías")),
                ("T2_Plan", RawValue::from(8.0)),
                ("T2_Ejec", RawValue::from(2.0)),
            ]),
            row(&[("PROGRAMA", RawValue::from("Cultura"))]),
        ];
        let metas = normalize_rows(&rows);

        Dataset {
            global_metrics: global_metrics(&metas),
            program_performance: program_performance(&metas),
            metadata: Metadata {
                total_metas: metas.len(),
                last_updated: Utc::now(),
                source: "PlanIndicativo.xlsx".to_string(),
            },
            metas,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let dataset = create_test_dataset();
        let markdown = generate_markdown_report(&dataset, 10);

        assert!(markdown.contains("# PlanMetas Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("`PlanIndicativo.xlsx`"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("## Quarterly Completion"));
        assert!(markdown.contains("| T1 | 10 | 9.5 | 95% |"));
        assert!(markdown.contains("| Salud | 1 | 10 | 9.5 | 95% |"));
        assert!(!markdown.contains("Top "));
    }

    #[test]
    fn test_programs_section_is_ranked_and_truncated() {
        let dataset = create_test_dataset();
        let section = generate_programs_section(&dataset.program_performance, 2);

        assert!(section.contains("Top 2 of 3 programs"));
        let salud = section.find("| Salud").unwrap();
        let vias = section.find("| Vías").unwrap();
        assert!(salud < vias);
        assert!(!section.contains("| Cultura"));
    }

    #[test]
    fn test_empty_programs_section() {
        let section = generate_programs_section(&ProgramPerformance::new(), 10);
        assert!(section.contains("No metas were found"));
    }

    #[test]
    fn test_summary_section() {
        let dataset = create_test_dataset();
        let dist = evaluation_distribution(&dataset.metas);
        let section = generate_summary_section(&dataset.global_metrics, &dist);

        assert!(section.contains("Sin Programación"));
        assert!(section.contains("| 1 | 0 | 1 | 1 | **3** |"));
    }

    #[test]
    fn test_generate_json_report() {
        let dataset = create_test_dataset();
        let json = generate_json_report(&dataset).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["totalMetas"], 3);
        assert_eq!(value["global_metrics"]["total_metas"], 3);
        assert_eq!(value["program_performance"]["Salud"]["metas_count"], 1);
        assert_eq!(value["evaluations"]["Avance Alto"], 1);
        assert_eq!(value["metas"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_report(&create_test_dataset(), &path, OutputFormat::Markdown, 10).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# PlanMetas Report"));
    }
}
