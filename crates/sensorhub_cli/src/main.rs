//! SensorHub demo entry point.
//!
//! # Responsibility
//! - Open the statically configured store for the process lifetime.
//! - Run the CRUD walkthrough through the service and print each step.

use log::error;
use sensorhub_core::{
    core_version, default_log_level, init_logging, run_crud_demo, DemoReport,
    DocumentDeviceRepository, SensorDevice, SensorDeviceService, SqliteDeviceRepository, Store,
    StoreConfig,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = StoreConfig::from_static();
    if let Err(err) = init_logging(default_log_level(), config.log_dir()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    println!("=== SensorHub {} ===", core_version());
    println!("Backend: {}", config.backend.as_str());
    println!();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &StoreConfig) -> Result<(), Box<dyn Error>> {
    let store = Store::open(config)?;

    let report = match &store {
        Store::Relational(conn) => {
            let repo = SqliteDeviceRepository::try_new(conn)?;
            run_crud_demo(&SensorDeviceService::new(repo))
        }
        Store::Document(db) => {
            let repo = DocumentDeviceRepository::try_new(db)?;
            run_crud_demo(&SensorDeviceService::new(repo))
        }
    };

    let report = finish(report, store.close())?;
    print_report(&report)?;
    Ok(())
}

/// Keeps the demo failure when both the demo and the close fail; the close
/// failure is logged on its own.
fn finish<T, E, C>(outcome: Result<T, E>, closed: Result<(), C>) -> Result<T, Box<dyn Error>>
where
    E: Error + 'static,
    C: Error + 'static,
{
    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(Box::new(close_err)),
        (Err(err), Ok(())) => Err(Box::new(err)),
        (Err(err), Err(close_err)) => {
            error!("event=db_close module=cli status=error error={close_err}");
            Err(Box::new(err))
        }
    }
}

fn print_report(report: &DemoReport) -> Result<(), serde_json::Error> {
    println!("Id policy: {:?}", report.id_policy);
    if report.cleared > 0 {
        println!("Removed {} device(s) from a previous run", report.cleared);
    }
    println!();

    println!("1. Created devices");
    for device in &report.created {
        println!("  {}", render(device)?);
    }

    println!("2. All devices ({})", report.listed.len());
    for device in &report.listed {
        println!("  - {}", render(device)?);
    }

    println!("3. Fetched by id");
    match &report.fetched {
        Some(device) => println!("  {}", render(device)?),
        None => println!("  (not found)"),
    }

    println!("4. Updated device");
    println!("  {}", render(&report.updated)?);

    println!("5. Deleted second device: {}", report.deleted);

    println!("6. Remaining devices ({})", report.remaining.len());
    for device in &report.remaining {
        println!("  - {}", render(device)?);
    }

    Ok(())
}

fn render(device: &SensorDevice) -> Result<String, serde_json::Error> {
    serde_json::to_string(device)
}

#[cfg(test)]
mod tests {
    use super::finish;
    use std::fmt::{Display, Formatter};

    #[derive(Debug)]
    struct Failure(&'static str);

    impl Display for Failure {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for Failure {}

    #[test]
    fn demo_error_wins_over_close_error() {
        let err = finish::<(), _, _>(Err(Failure("demo failed")), Err(Failure("close failed")))
            .unwrap_err();
        assert_eq!(err.to_string(), "demo failed");
    }

    #[test]
    fn close_error_surfaces_after_successful_demo() {
        let err = finish(Ok::<_, Failure>(7), Err(Failure("close failed"))).unwrap_err();
        assert_eq!(err.to_string(), "close failed");
    }

    #[test]
    fn clean_run_returns_report() {
        assert_eq!(finish(Ok::<_, Failure>(7), Ok::<(), Failure>(())).unwrap(), 7);
    }
}
