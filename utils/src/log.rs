
use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle, with_thread, WriteMode};
use super::error::*;

///
/// Macros to write to the backing file logger.
///
pub use log::{trace as trace, debug as debug, info as info, warn as warn, error as error};

///
/// Starts the logstream, writing to a timestamped file under the given 
/// directory and mirroring info-level records to stderr. The returned 
/// handle flushes the file when dropped, so keep it alive for the 
/// duration of the program.
///
pub fn initialize (path: & str, filename: & str) -> Result<LoggerHandle>
{
    let file_spec = FileSpec::default()
        .directory(path)
        .basename(filename)
        .use_timestamp(true)
        .suffix("log");

    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(file_spec)
        .write_mode(WriteMode::BufferAndFlush)
        .duplicate_to_stderr(Duplicate::Info)
        .format_for_files(with_thread)
        .start()
        .context(format!("Failed to start the logger in '{}'.", path))?;

    Ok(handle)
}
