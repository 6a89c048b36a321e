pub mod export;

pub use export::{build_export_payload, export_file_name, export_match_log_json, MatchLogExport};
