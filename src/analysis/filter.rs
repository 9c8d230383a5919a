//! Meta list filtering, matching the dashboard's list controls.

use crate::models::{Evaluacion, Meta};
use serde::Deserialize;

/// Value meaning "no filter" for a selector.
const ALL: &str = "all";

/// Filter criteria. Absent or `"all"` selectors match everything; all
/// given criteria must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaFilter {
    /// Exact program name.
    pub programa: Option<String>,
    /// Evaluation tier label, e.g. `Avance Alto`.
    pub evaluacion: Option<String>,
    /// Exact project status.
    pub estado: Option<String>,
    /// Exact responsible party.
    pub responsable: Option<String>,
    /// Case-insensitive substring of the indicator or program name.
    pub q: Option<String>,
}

impl MetaFilter {
    /// True when no criterion would exclude anything.
    pub fn is_empty(&self) -> bool {
        selector(&self.programa).is_none()
            && selector(&self.evaluacion).is_none()
            && selector(&self.estado).is_none()
            && selector(&self.responsable).is_none()
            && self.search().is_none()
    }

    /// Whether a meta passes every criterion.
    pub fn matches(&self, meta: &Meta) -> bool {
        if let Some(programa) = selector(&self.programa) {
            if meta.programa != programa {
                return false;
            }
        }

        if let Some(label) = selector(&self.evaluacion) {
            match Evaluacion::from_label(label) {
                Some(tier) if tier == meta.evaluacion => {}
                _ => return false,
            }
        }

        if let Some(estado) = selector(&self.estado) {
            if meta.estado_proyecto != estado {
                return false;
            }
        }

        if let Some(responsable) = selector(&self.responsable) {
            if meta.dependencia_responsable != responsable {
                return false;
            }
        }

        if let Some(needle) = self.search() {
            let needle = needle.to_lowercase();
            if !meta.indicador.to_lowercase().contains(&needle)
                && !meta.programa.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        true
    }

    /// Metas passing the filter, in sheet order.
    pub fn apply<'a>(&self, metas: &'a [Meta]) -> Vec<&'a Meta> {
        metas.iter().filter(|m| self.matches(m)).collect()
    }

    fn search(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }
}

fn selector(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty() && *v != ALL)
}

/// Distinct non-blank values of a text field, sorted.
pub fn distinct_values<F>(metas: &[Meta], field: F) -> Vec<String>
where
    F: Fn(&Meta) -> &str,
{
    let mut values: Vec<String> = metas
        .iter()
        .map(&field)
        .filter(|v| !v.trim().is_empty())
        .map(String::from)
        .collect();
    values.sort();
    values.dedup();
    values
}
