use cdr_cli::logging::build_env_filter;
use tracing::level_filters::LevelFilter;

#[test]
fn explicit_level_ignores_rust_log() {
    let filter = build_env_filter(LevelFilter::DEBUG, true);
    assert_eq!(filter.to_string().to_lowercase(), "debug");
}
