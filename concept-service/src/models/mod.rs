pub mod concept_report;

pub use concept_report::ConceptReport;
