use log::LevelFilter;
use std::{io::Write, sync::OnceLock, time::Instant};

static START: OnceLock<Instant> = OnceLock::new();

/// Installs an `env_logger` printing `[LEVEL  elapsed] message` to stderr. `RUST_LOG` still
/// overrides `level`. Installing a second logger (e.g. from several tests) is silently ignored.
pub fn build_logger_for_level(level: LevelFilter) {
    let start = *START.get_or_init(Instant::now);

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(move |buf, record| {
            writeln!(
                buf,
                "[{:<5} {:>9.3}s] {}",
                record.level(),
                start.elapsed().as_secs_f64(),
                record.args()
            )
        })
        .is_test(cfg!(test))
        .try_init();
}

/// Starts at `base` and raises the level by one for each verbosity step (e.g. `-vv`)
pub fn build_logger_for_verbosity(base: LevelFilter, verbosity: usize) {
    let levels = LevelFilter::iter().collect::<Vec<_>>();
    let base_idx = levels.iter().position(|&l| l == base).unwrap_or(0);
    let level = levels[(base_idx + verbosity).min(levels.len() - 1)];
    build_logger_for_level(level);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn repeated_initialization() {
        build_logger_for_level(LevelFilter::Info);
        build_logger_for_verbosity(LevelFilter::Warn, 2);
        log::info!("still alive");
    }
}
