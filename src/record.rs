//! # Patient Records
//!
//! A record is a fixed set of string fields. Missing fields read as empty.
//!
//! ## CSV format
//!
//! The header must name every required column. Portuguese headers are
//! accepted as aliases.
//!
//! | Column | Alias | Required |
//! |--------|-------|----------|
//! | `card number` | `Número da carteirinha` | yes |
//! | `patient name` | `Nome do paciente` | yes |
//! | `birth date` | `Data de nascimento` | yes |
//! | `mother's name` | `Nome da mãe` | yes |
//! | `insurer` | `Convênio` | yes |
//! | `physician` | `Médico responsável` | yes |
//! | `sex` | `Sexo` | yes |
//! | `admission date` | `Data de admissão` | yes |
//! | `admission time` | `Hora de admissão` | yes |
//! | `extra text` | `Texto adicional` | no |

use std::collections::HashMap;
use std::io::{Read, Write};

use crate::error::WristbandError;

/// Keys of a patient record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordField {
    CardNumber,
    PatientName,
    BirthDate,
    MotherName,
    Insurer,
    Physician,
    Sex,
    AdmissionDate,
    AdmissionTime,
    ExtraText,
}

impl RecordField {
    /// Columns every CSV must carry, in template order.
    pub const REQUIRED: [RecordField; 9] = [
        RecordField::CardNumber,
        RecordField::PatientName,
        RecordField::BirthDate,
        RecordField::MotherName,
        RecordField::Insurer,
        RecordField::Physician,
        RecordField::Sex,
        RecordField::AdmissionDate,
        RecordField::AdmissionTime,
    ];

    /// Column header.
    pub fn column(self) -> &'static str {
        match self {
            RecordField::CardNumber => "card number",
            RecordField::PatientName => "patient name",
            RecordField::BirthDate => "birth date",
            RecordField::MotherName => "mother's name",
            RecordField::Insurer => "insurer",
            RecordField::Physician => "physician",
            RecordField::Sex => "sex",
            RecordField::AdmissionDate => "admission date",
            RecordField::AdmissionTime => "admission time",
            RecordField::ExtraText => "extra text",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            RecordField::CardNumber => &["Número da carteirinha"],
            RecordField::PatientName => &["Nome do paciente"],
            RecordField::BirthDate => &["Data de nascimento"],
            RecordField::MotherName => &["Nome da mãe"],
            RecordField::Insurer => &["Convênio"],
            RecordField::Physician => &["Médico responsável"],
            RecordField::Sex => &["Sexo"],
            RecordField::AdmissionDate => &["Data de admissão"],
            RecordField::AdmissionTime => &["Hora de admissão"],
            RecordField::ExtraText => &["Texto adicional", "Texto Adicional"],
        }
    }

    /// Match a CSV header (case-insensitive, surrounding space ignored).
    pub fn from_column(header: &str) -> Option<RecordField> {
        let header = header.trim();
        Self::REQUIRED
            .iter()
            .chain(std::iter::once(&RecordField::ExtraText))
            .copied()
            .find(|field| {
                field.column().eq_ignore_ascii_case(header)
                    || field.aliases().iter().any(|a| a.to_lowercase() == header.to_lowercase())
            })
    }
}

/// One patient's data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientRecord {
    values: HashMap<RecordField, String>,
}

impl PatientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: RecordField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: RecordField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Trimmed value, empty when absent.
    pub fn get(&self, field: RecordField) -> &str {
        self.values.get(&field).map(|v| v.trim()).unwrap_or("")
    }

    pub fn card_number(&self) -> &str {
        self.get(RecordField::CardNumber)
    }

    pub fn patient_name(&self) -> &str {
        self.get(RecordField::PatientName)
    }

    /// Extra text, if present and not blank.
    pub fn extra_text(&self) -> Option<&str> {
        Some(self.get(RecordField::ExtraText)).filter(|t| !t.is_empty())
    }
}

/// Read records from CSV. Fails if any required column is missing.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<PatientRecord>, WristbandError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns: Vec<Option<RecordField>> =
        headers.iter().map(RecordField::from_column).collect();

    let missing: Vec<&str> = RecordField::REQUIRED
        .iter()
        .filter(|field| !columns.contains(&Some(**field)))
        .map(|field| field.column())
        .collect();
    if !missing.is_empty() {
        return Err(WristbandError::Csv(format!(
            "missing expected column(s): {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let mut record = PatientRecord::new();
        for (column, value) in columns.iter().zip(row.iter()) {
            if let Some(field) = column {
                record.set(*field, value);
            }
        }
        records.push(record);
    }
    tracing::debug!(records = records.len(), "records imported");
    Ok(records)
}

/// Two sample patients for the example template.
pub fn example_records() -> Vec<PatientRecord> {
    use RecordField::*;
    vec![
        PatientRecord::new()
            .with(CardNumber, "123456")
            .with(PatientName, "João Silva")
            .with(BirthDate, "1990-05-12")
            .with(MotherName, "Maria Silva")
            .with(Insurer, "SUS")
            .with(Physician, "Dra. Aline")
            .with(Sex, "M")
            .with(AdmissionDate, "2025-10-15")
            .with(AdmissionTime, "14:30"),
        PatientRecord::new()
            .with(CardNumber, "987654")
            .with(PatientName, "Ana Pereira")
            .with(BirthDate, "1985-08-01")
            .with(MotherName, "Clara Pereira")
            .with(Insurer, "Particular")
            .with(Physician, "Dr. Bruno")
            .with(Sex, "F")
            .with(AdmissionDate, "2025-10-15")
            .with(AdmissionTime, "15:10"),
    ]
}

/// Write records as CSV with the required columns.
pub fn write_csv<W: Write>(writer: W, records: &[PatientRecord]) -> Result<(), WristbandError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(RecordField::REQUIRED.iter().map(|f| f.column()))?;
    for record in records {
        csv_writer.write_record(RecordField::REQUIRED.iter().map(|f| record.get(*f)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the example template (header plus two sample rows).
pub fn write_example_csv<W: Write>(writer: W) -> Result<(), WristbandError> {
    write_csv(writer, &example_records())
}

/// Write the empty template (header only).
pub fn write_empty_csv<W: Write>(writer: W) -> Result<(), WristbandError> {
    write_csv(writer, &[])
}
