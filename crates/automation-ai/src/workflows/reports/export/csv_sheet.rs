use super::ExportError;
use crate::workflows::assessments::{Assessment, Factor};
use crate::workflows::reports::composer::ReportDocument;

pub const CSV_HEADERS: [&str; 12] = [
    "Process Name",
    "Department",
    "Repetitiveness",
    "Rule-Based",
    "Complexity",
    "Volume",
    "Standardization",
    "Error Rate",
    "Total Score",
    "Automation Suitability",
    "Priority",
    "Recommendation",
];

/// Header row followed by one row per member assessment, in document order.
pub fn render_csv(document: &ReportDocument) -> Result<Vec<u8>, ExportError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;
    for assessment in &document.assessments {
        writer.write_record(row(assessment))?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

fn row(assessment: &Assessment) -> Vec<String> {
    let mut cells = Vec::with_capacity(CSV_HEADERS.len());
    cells.push(assessment.process_name.clone());
    cells.push(assessment.department.clone().unwrap_or_default());
    for factor in Factor::ordered() {
        cells.push(assessment.factors().get(factor).to_string());
    }
    cells.push(assessment.total_score().to_string());
    cells.push(assessment.suitability().label().to_string());
    cells.push(assessment.priority().label().to_string());
    cells.push(assessment.recommendation().to_string());
    cells
}
