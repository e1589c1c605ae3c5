//! Entry point: open the cube window, render until closed.
//!
//! Exit status 0 after the window is closed, 1 if graphics initialization
//! or the loop itself fails.

mod cli;

use std::error::Error;
use std::fmt::Display;
use std::process::ExitCode;

use anyhow::{Context, Result};
use platform::{PlatformError, RunConfig};

/// stderr line for a failed graphics initialization.
fn init_error_message(err: &impl Display) -> String {
    format!("GLEW Init error: '{err}'")
}

/// Cause chain of an error, outermost first, joined with ": ".
fn cause_chain(err: &(dyn Error + 'static)) -> String {
    std::iter::successors(Some(err), |&e| e.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

/// What goes to stderr when `run` fails. Anything that kept the loop from
/// reaching a drawable window counts as a failed graphics initialization.
fn failure_line(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PlatformError>() {
        Some(platform) if platform.is_init_failure() => init_error_message(&cause_chain(platform)),
        _ => format!("Error: {err:#}"),
    }
}

fn run(opts: cli::LaunchOptions) -> Result<()> {
    let config = RunConfig {
        backends: opts.backends,
        show_fps: opts.show_fps,
        ..RunConfig::default()
    };
    platform::run_cube_window(config).context("render loop failed")
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = cli::parse_args(std::env::args().skip(1));
    log::info!(
        "Starting glcube. Backend: {:?}, show_fps={}",
        opts.backends,
        opts.show_fps
    );

    match run(opts) {
        Ok(()) => {
            log::info!("Graceful shutdown. Bye!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", failure_line(&err));
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::RendererError;
    use winit::error::EventLoopError;

    #[test]
    fn init_error_names_the_loader_and_quotes_the_cause() {
        let msg = init_error_message(&"no suitable GPU adapter");
        assert_eq!(msg, "GLEW Init error: 'no suitable GPU adapter'");
    }

    fn failed_run(err: PlatformError) -> anyhow::Error {
        Err::<(), _>(err).context("render loop failed").unwrap_err()
    }

    #[test]
    fn missing_gpu_reports_the_loader_line() {
        let err = failed_run(PlatformError::GraphicsInit(RendererError::NoAdapter(
            wgpu::Backends::GL,
        )));
        let line = failure_line(&err);
        assert!(line.starts_with("GLEW Init error: 'no suitable GPU adapter"), "{line}");
        assert!(line.ends_with('\''));
    }

    #[test]
    fn event_loop_setup_failure_reports_the_loader_line() {
        let err = failed_run(PlatformError::EventLoopInit(EventLoopError::RecreationAttempt));
        let cause = EventLoopError::RecreationAttempt.to_string();
        assert_eq!(
            failure_line(&err),
            format!("GLEW Init error: 'event loop could not be created: {cause}'")
        );
    }

    #[test]
    fn runtime_failure_is_a_plain_error() {
        let line = failure_line(&failed_run(PlatformError::OutOfMemory));
        assert!(!line.contains("GLEW Init error"));
        assert_eq!(
            line,
            "Error: render loop failed: GPU ran out of memory while acquiring a frame"
        );
    }
}
