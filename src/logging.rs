use env_logger::WriteStyle;
use log::LevelFilter;
use std::io::Write;

/// Installs the default logger.
///
/// Fails if another logger has already been set, in which case log output keeps going
/// to that one.
pub fn try_init() -> Result<(), log::SetLoggerError> {
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "[RACESIM | {}] {}", record.level(), record.args()))
        .write_style(WriteStyle::Always)
        .filter(None, LevelFilter::Info)
        .try_init()
}
