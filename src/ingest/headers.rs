//! Header names accepted for each canonical field, in priority order.
//!
//! Spreadsheet releases rename columns from year to year; every spelling
//! seen so far is listed here. Add new spellings at the end of a list
//! unless they should take precedence.

use super::resolver::Candidates;

pub const T1_PLAN: Candidates = &[
    "T1. PLANEADO 2025",
    "T1 PLANEADO 2025",
    "T1 PLANEADO",
    "T1_PLANEADO",
    "T1_Plan",
];
pub const T1_EJEC: Candidates = &[
    "T1. EJECUTADO 2025",
    "T1 EJECUTADO 2025",
    "T1 EJECUTADO",
    "T1_EJECUTADO",
    "T1_Ejec",
];
pub const T2_PLAN: Candidates = &[
    "T2. PLANEADO 2025",
    "T2 PLANEADO 2025",
    "T2 PLANEADO",
    "T2_PLANEADO",
    "T2_Plan",
];
pub const T2_EJEC: Candidates = &[
    "T2. EJECUTADO 2025",
    "T2 EJECUTADO 2025",
    "T2 EJECUTADO",
    "T2_EJECUTADO",
    "T2_Ejec",
];
pub const T3_PLAN: Candidates = &[
    "T3. PLANEADO 2025",
    "T3 PLANEADO 2025",
    "T3 PLANEADO",
    "T3_PLANEADO",
    "T3_Plan",
];
pub const T3_EJEC: Candidates = &[
    "T3. EJECUTADO 2025",
    "T3 EJECUTADO 2025",
    "T3 EJECUTADO",
    "T3_EJECUTADO",
    "T3_Ejec",
];
pub const T4_PLAN: Candidates = &[
    "T4. PLANEADO 2025",
    "T4 PLANEADO 2025",
    "T4 PLANEADO",
    "T4_PLANEADO",
    "T4_Plan",
];
// The 2025 sheet spells this one "T.4".
pub const T4_EJEC: Candidates = &[
    "T.4 EJECUTADO 2025",
    "T4. EJECUTADO 2025",
    "T4 EJECUTADO 2025",
    "T4 EJECUTADO",
    "T4_EJECUTADO",
    "T4_Ejec",
];

pub const TOTAL_PLAN: Candidates = &["TOTAL PLANEADO 2025", "TOTAL PLANEADO"];
pub const TOTAL_EJEC: Candidates = &["TOTAL EJECUTADO 2025", "TOTAL EJECUTADO"];

pub const AVANCE: Candidates = &["AVANCE 2025", "% TOTAL AVANCE 2025", "% AVANCE", "AVANCE"];
pub const AVANCE_ESTADO: Candidates = &[
    "% TOTAL PLANEADO 2025",
    "% EN TOTAL DEL ESTADO",
    "% ESTADO",
];

pub const ID: Candidates = &["No", "N°", "N", "ID"];
pub const EJE: Candidates = &["   EJE", "EJE"];
pub const SECTOR_PROGRAMA: Candidates = &["SECTOR", "SECTOR PROGRAMA"];
pub const NOMBRE_SECTOR_PROGRAMA: Candidates = &[
    "NOMBRE DEL PROGRAMA",
    "NOMBRE SECTOR PROGRAMA",
    "NOMBRE SECTOR",
];
pub const OBJETIVO_META: Candidates = &[
    "OBJETIVO DEL PROGRAMA",
    "OBJETIVO DE META DO",
    "OBJETIVO META",
];
pub const META_PROGRAMA: Candidates = &[
    "META DE RESULTADO",
    "META DE PROGRAMA DO",
    "META PROGRAMA",
];
pub const N_INDICADOR: Candidates = &["N° META RESULTADO", "N° INDICADOR", "NINDICADOR"];
pub const LINEA_BASE: Candidates = &["LÍNEA BASE (2023)", "LINEA BASE (2023)", "LINEA BASE"];
pub const LINEA_BASE_2023: Candidates = &["LINEA BASE (2023)", "LÍNEA BASE (2023)"];
pub const EJECUTADO_2024: Candidates = &["Ejecutado (2024)", "EJECUTADO"];
pub const ESPERADO_2027: Candidates = &["ESPERADO 2027", "ESPERADO 2027_1", "ESPERADO"];
pub const DEPENDENCIA_RESPONSABLE: Candidates = &["DEPENDENCIA RESPONSABLE", "DEPENDENCIA"];
pub const N_METAS_PROYECTO: Candidates = &[
    "N° BANDO DE PROYECTO",
    "N° METAS EN PROYECTO",
    "N METAS PROYECTO",
];
pub const N_METAS_PROTECT: Candidates = &["N° METAS PROYECTO PROTECT", "N METAS PROTECT"];
pub const NUMERO_META: Candidates = &["N° DE META EN EL PLAN DE DESARROLLO", "NUMERO META"];
pub const NOMBRE: Candidates = &["NOMBRE DEL PROYECTO", "NOMBRE"];
pub const META_PRODUCTO: Candidates = &["META DE PRODUCTO", "META"];
pub const INDICADOR_PRODUCTO: Candidates = &["INDICADOR DE PRODUCTO", "INDICADOR"];
pub const INDICADOR: Candidates = &["INDICADOR", "INDICADOR DE PRODUCTO"];
pub const CODIGO_DANE: Candidates = &["CODIGO DANE"];
pub const CODIGO_CCPET: Candidates = &["CÓDIGO CCPET", "CODIGO CCPET"];
pub const PROGRAMA: Candidates = &[
    "NOMBRE DEL PROGRAMA",
    "ESTADO PROGRAMA DO-NO-DO PROGRAMA",
    "ESTADO PROGRAMA",
    "PROGRAMA",
    "ESTADO",
];
pub const ESTADO_PROYECTO: Candidates = &[
    "ESTADO PROGRAMADO-NO PROGRAMADO",
    "ESTADO DEL PROYECTO",
    "ESTADO PROYECTO",
];

/// Every recognized header, for diagnostics.
pub fn all() -> impl Iterator<Item = &'static str> {
    [
        T1_PLAN,
        T1_EJEC,
        T2_PLAN,
        T2_EJEC,
        T3_PLAN,
        T3_EJEC,
        T4_PLAN,
        T4_EJEC,
        TOTAL_PLAN,
        TOTAL_EJEC,
        AVANCE,
        AVANCE_ESTADO,
        ID,
        EJE,
        SECTOR_PROGRAMA,
        NOMBRE_SECTOR_PROGRAMA,
        OBJETIVO_META,
        META_PROGRAMA,
        N_INDICADOR,
        LINEA_BASE,
        LINEA_BASE_2023,
        EJECUTADO_2024,
        ESPERADO_2027,
        DEPENDENCIA_RESPONSABLE,
        N_METAS_PROYECTO,
        N_METAS_PROTECT,
        NUMERO_META,
        NOMBRE,
        META_PRODUCTO,
        INDICADOR_PRODUCTO,
        INDICADOR,
        CODIGO_DANE,
        CODIGO_CCPET,
        PROGRAMA,
        ESTADO_PROYECTO,
    ]
    .into_iter()
    .flat_map(|list| list.iter().copied())
}

/// Whether a sheet header is used by any canonical field.
pub fn is_recognized(header: &str) -> bool {
    all().any(|known| known == header)
}
