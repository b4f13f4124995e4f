use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gridlink::backend::LocalProcessBackend;
use gridlink::config::{load_user_settings, ClientSettings};
use gridlink::{ident, JobHandle, SubmitMode};

#[derive(Parser, Debug)]
#[command(name = "submit-job")]
#[command(about = "Run a job through the local-process backend")]
struct Args {
    /// Program to execute
    #[arg(short, long)]
    program: String,

    /// Program arguments (repeatable)
    #[arg(short, long)]
    arg: Vec<String>,

    /// Working directory for the job
    #[arg(long)]
    workdir: Option<String>,

    /// File to capture stdout into
    #[arg(short, long)]
    output: Option<String>,

    /// Wait for the job to finish instead of polling
    #[arg(long)]
    block: bool,

    /// Write the backend id to this file after submission
    #[arg(long)]
    log_path: Option<PathBuf>,

    /// Seconds between status polls (non-blocking mode)
    #[arg(long, default_value = "1")]
    poll_secs: u64,

    /// Give up after this many polls (non-blocking mode)
    #[arg(long, default_value = "60")]
    max_polls: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let settings = std::env::var_os("HOME")
        .and_then(|home| load_user_settings(home.as_ref()))
        .map(|doc| ClientSettings::from_document(&doc))
        .unwrap_or_default();

    let backend = Arc::new(LocalProcessBackend::new());
    let mut handle = JobHandle::new(&args.program, ident::generate(), backend)?;

    for value in &args.arg {
        handle.add_argument(value);
    }
    if let Some(workdir) = &args.workdir {
        handle.set_working_dir(workdir);
    }
    if let Some(output) = &args.output {
        handle.set_output_file(output);
    }
    if let Some(queue) = &settings.default_queue {
        handle.set_queue(queue);
    }

    println!("Job ID: {}", ident::to_canonical_string(&handle.id()));

    if args.block {
        handle.submit(SubmitMode::Blocking, args.log_path.as_deref())?;
        println!("Status: {}", handle.job().status);
    } else {
        handle.submit(SubmitMode::Background, args.log_path.as_deref())?;
        println!("Backend ID: {}", handle.job().backend_id);

        let status =
            handle.wait_terminal(Duration::from_secs(args.poll_secs), args.max_polls)?;
        if status.is_terminal() {
            println!("Status: {}", status);
        } else {
            println!("Still {} after {} polls, giving up", status, args.max_polls);
        }
    }

    Ok(())
}
