// Raw rows -> canonical records, one normalizer per source kind.
//
// Normalizers are total: one record per row, in row order. Numeric cells go
// through `util::parse_quantity`/`parse_hours`, so bad cells become 0.0 and
// never drop the row.
use crate::resolver::resolve;
use crate::types::{HourLogRecord, PaintingRecord, RawRow, ScaffoldRecord};
use crate::util::{parse_hours, parse_quantity, NumberFormat};

/// Header synonyms seen across the field spreadsheets, most specific first.
pub mod fields {
    pub const WORK_ORDER: &[&str] = &[
        "OS",
        "O.S",
        "O.S.",
        "Nº OS",
        "Ordem de Serviço",
        "Entregável",
        "Work Order",
    ];

    pub const AREA: &[&str] = &["M²", "m²", "M2", "m2", "Área", "Metragem", "Area"];
    pub const LITERS: &[&str] = &["Litros", "Volume", "Consumo", "Quantidade"];
    pub const REFERENCE: &[&str] = &["Referência", "Ref", "Código", "Item"];
    pub const DESCRIPTION: &[&str] = &["Descrição", "Serviço", "Description"];
    pub const PAINT_COLOR: &[&str] = &["Cor", "Tinta", "Color"];
    pub const APPLICATOR: &[&str] = &["Pintor", "Aplicador", "Responsável", "Applicator"];

    pub const LINEAR_M: &[&str] = &[
        "Metro Linear Real",
        "Metro Linear",
        "Metros Lineares",
        "ML",
        "ml",
    ];
    pub const CREW_SIZE: &[&str] = &["Qtd Montadores", "Montadores", "Crew Size"];
    pub const CREW: &[&str] = &["Equipe", "Turma", "Crew"];
    pub const SUPERVISOR: &[&str] = &["Encarregado", "Supervisor", "Líder"];

    pub const HOURS: &[&str] = &["Total Horas", "Horas", "HH", "Hours"];
    pub const WORKER: &[&str] = &["Matrícula", "Colaborador", "Funcionário", "Nome", "Worker"];
    pub const ROLE: &[&str] = &["Função", "Cargo", "Role"];
    pub const HOUR_DATE: &[&str] = &["Data Referência", "Data", "Date"];

    pub const DATE: &[&str] = &["Data", "Date"];
}

fn text(row: &RawRow, candidates: &[&str]) -> String {
    resolve(row, candidates).trim().to_string()
}

pub fn normalize_painting(rows: &[RawRow], format: NumberFormat) -> Vec<PaintingRecord> {
    rows.iter()
        .map(|row| PaintingRecord {
            work_order: text(row, fields::WORK_ORDER),
            area_m2: parse_quantity(resolve(row, fields::AREA), format),
            liters: parse_quantity(resolve(row, fields::LITERS), format),
            reference: text(row, fields::REFERENCE),
            description: text(row, fields::DESCRIPTION),
            paint_color: text(row, fields::PAINT_COLOR),
            date: text(row, fields::DATE),
            applicator: text(row, fields::APPLICATOR),
        })
        .collect()
}

pub fn normalize_scaffold(rows: &[RawRow], format: NumberFormat) -> Vec<ScaffoldRecord> {
    rows.iter()
        .map(|row| ScaffoldRecord {
            work_order: text(row, fields::WORK_ORDER),
            linear_m: parse_quantity(resolve(row, fields::LINEAR_M), format),
            crew_size: parse_quantity(resolve(row, fields::CREW_SIZE), format),
            crew: text(row, fields::CREW),
            supervisor: text(row, fields::SUPERVISOR),
            date: text(row, fields::DATE),
        })
        .collect()
}

pub fn normalize_hours(rows: &[RawRow], format: NumberFormat) -> Vec<HourLogRecord> {
    rows.iter()
        .map(|row| HourLogRecord {
            work_order: text(row, fields::WORK_ORDER),
            hours: parse_hours(resolve(row, fields::HOURS), format),
            worker: text(row, fields::WORKER),
            role: text(row, fields::ROLE),
            date: text(row, fields::HOUR_DATE),
        })
        .collect()
}
