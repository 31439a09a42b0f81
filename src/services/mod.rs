pub mod deduplicator;
pub mod metadata_parser;
pub mod overlap_matcher;
pub mod question_segmenter;
pub mod syllabus_parser;
pub mod text_extractor;
pub mod warn_writer;

pub use deduplicator::Deduplicator;
pub use metadata_parser::parse_metadata;
pub use overlap_matcher::{compute_overlap, normalize, OverlapMatcher};
pub use question_segmenter::QuestionSegmenter;
pub use syllabus_parser::SyllabusParser;
pub use text_extractor::extract_text;
pub use warn_writer::WarnWriter;
