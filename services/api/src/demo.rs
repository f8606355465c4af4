use crate::infra::{parse_scores, InMemoryStore};
use automation_ai::error::AppError;
use automation_ai::identity::OwnerId;
use automation_ai::workflows::assessments::{
    classify, AssessmentInput, AssessmentService, Factor, ImplementationEffort,
};
use automation_ai::workflows::insights::{recommend, FactorReadings};
use automation_ai::workflows::reports::{ExportFormat, ReportInput, ReportService};
use automation_ai::workflows::validation::ValidationError;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Six comma-separated factor scores: repetitiveness, rule-based, complexity, volume,
    /// standardization, error rate (each 1-5)
    #[arg(long)]
    pub(crate) scores: String,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Write the report CSV export to this path.
    #[arg(long)]
    pub(crate) csv_out: Option<PathBuf>,
    /// Write the report PDF export to this path.
    #[arg(long)]
    pub(crate) pdf_out: Option<PathBuf>,
    /// Rows per PDF page.
    #[arg(long, default_value_t = 30)]
    pub(crate) rows_per_page: usize,
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let factors =
        parse_scores(&args.scores).map_err(|reason| ValidationError::invalid("scores", reason))?;
    let classification = classify(&factors)?;

    println!("Total score: {}/30", classification.total_score);
    println!("Suitability: {}", classification.suitability.label());
    println!("Priority: {}", classification.priority.label());
    println!("Recommendation: {}", classification.suitability.recommendation());

    let mut readings = FactorReadings::default();
    for (factor, value) in Factor::ordered().into_iter().zip(&factors) {
        readings.set(factor, *value as f64);
    }
    println!("\nSuggestions");
    for suggestion in recommend(&readings) {
        match (suggestion.factor_label, suggestion.potential_improvement) {
            (Some(label), Some(gain)) => println!(
                "- [{}] {}: {} ({})",
                suggestion.priority.label(),
                label,
                suggestion.suggestion,
                gain
            ),
            _ => println!("- [{}] {}", suggestion.priority.label(), suggestion.suggestion),
        }
    }
    Ok(())
}

struct SampleProcess {
    name: &'static str,
    department: &'static str,
    scores: [i64; 6],
    cost_savings: Option<f64>,
    effort: ImplementationEffort,
}

const SAMPLE_PROCESSES: [SampleProcess; 5] = [
    SampleProcess {
        name: "Invoice matching",
        department: "Finance",
        scores: [5, 5, 4, 5, 4, 4],
        cost_savings: Some(48_000.0),
        effort: ImplementationEffort::Medium,
    },
    SampleProcess {
        name: "Payroll variance checks",
        department: "Finance",
        scores: [4, 4, 4, 4, 4, 4],
        cost_savings: Some(21_500.0),
        effort: ImplementationEffort::Low,
    },
    SampleProcess {
        name: "Vendor onboarding",
        department: "Procurement",
        scores: [3, 3, 2, 3, 3, 2],
        cost_savings: Some(9_000.0),
        effort: ImplementationEffort::Medium,
    },
    SampleProcess {
        name: "Contract negotiation",
        department: "Legal",
        scores: [1, 2, 1, 2, 1, 2],
        cost_savings: None,
        effort: ImplementationEffort::High,
    },
    SampleProcess {
        name: "Expense report review",
        department: "Finance",
        scores: [5, 4, 4, 5, 4, 3],
        cost_savings: Some(12_750.0),
        effort: ImplementationEffort::Low,
    },
];

impl SampleProcess {
    fn input(&self) -> AssessmentInput {
        AssessmentInput {
            process_name: Some(self.name.to_string()),
            department: Some(self.department.to_string()),
            repetitiveness_score: Some(self.scores[0]),
            rule_based_score: Some(self.scores[1]),
            complexity_score: Some(self.scores[2]),
            volume_score: Some(self.scores[3]),
            standardization_score: Some(self.scores[4]),
            current_errors_score: Some(self.scores[5]),
            estimated_cost_savings: self.cost_savings,
            implementation_effort: Some(self.effort),
            ..AssessmentInput::default()
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryStore::default());
    let assessments = AssessmentService::new(store.clone(), store.clone());
    let reports = ReportService::new(store.clone(), store, args.rows_per_page);
    let owner = OwnerId("demo-analyst".to_string());

    println!("Process automation assessment demo");
    let mut ids = Vec::with_capacity(SAMPLE_PROCESSES.len());
    for sample in &SAMPLE_PROCESSES {
        let assessment = assessments.create(&owner, sample.input())?;
        println!(
            "- {:<26} {:>2}/30  {:<28} priority {}",
            assessment.process_name,
            assessment.total_score(),
            assessment.suitability().label(),
            assessment.priority().label()
        );
        ids.push(assessment.id.0);
    }

    let stats = assessments.dashboard_stats(&owner)?;
    println!(
        "\nPortfolio: {} processes | avg score {:.1} | est. savings {}",
        stats.total_processes, stats.average_score, stats.total_estimated_savings
    );

    let report = reports.create(
        &owner,
        ReportInput {
            title: Some("Automation Opportunities".to_string()),
            description: Some("Sample portfolio seeded by the demo command".to_string()),
            assessment_ids: Some(ids),
        },
    )?;
    let conclusion = reports.generate_conclusion(&owner, report.id)?;
    println!("\nConclusion\n{conclusion}");

    let csv = reports.export(&owner, report.id, ExportFormat::Csv)?;
    println!("\nCSV export ({})", csv.filename);
    println!("{}", String::from_utf8_lossy(&csv.bytes));

    if let Some(path) = args.csv_out {
        std::fs::write(&path, &csv.bytes)?;
        println!("CSV written to {}", path.display());
    }
    if let Some(path) = args.pdf_out {
        let pdf = reports.export(&owner, report.id, ExportFormat::Pdf)?;
        std::fs::write(&path, &pdf.bytes)?;
        println!("PDF written to {} ({} bytes)", path.display(), pdf.bytes.len());
    }

    Ok(())
}
