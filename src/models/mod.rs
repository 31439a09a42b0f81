pub mod loaders;
pub mod paper;
pub mod question;
pub mod report;
pub mod syllabus;

pub use loaders::{load_all_toml_files, load_toml_to_generated_paper};
pub use paper::{GeneratedPaper, GeneratedQuestion};
pub use question::{ExtractedQuestion, MetadataOverrides, PaperMetadata, StoredQuestion};
pub use report::OverlapReport;
pub use syllabus::{SyllabusSubject, SyllabusUnit};
