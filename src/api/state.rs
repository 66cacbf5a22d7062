use std::path::PathBuf;

use crate::analyze::MatchAnalyzer;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: MatchAnalyzer,
    pub static_dir: PathBuf,
}
