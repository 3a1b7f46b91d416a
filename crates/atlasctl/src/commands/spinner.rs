//! Spinner driven by provisioning progress events

use std::time::Duration;

use atlasctl_core::{ProgressCallback, ProgressEvent};
use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg} [{elapsed_precise}]";

/// Create a spinner on stderr and a progress callback that updates it.
///
/// indicatif hides the spinner when stderr is not a terminal.
pub fn provisioning_spinner(cluster: &str) -> (ProgressBar, Option<ProgressCallback>) {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE);
    if let Ok(style) = style {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Submitting cluster {}", cluster));

    let pb_clone = pb.clone();
    let callback: ProgressCallback = Box::new(move |event| pb_clone.set_message(describe(&event)));

    (pb, Some(callback))
}

fn describe(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Submitted { cluster } => {
            format!("Cluster {} submitted, waiting for it to become ready", cluster)
        }
        ProgressEvent::Polling {
            cluster,
            state,
            attempt,
            max_attempts,
            ..
        } => format!(
            "Cluster {}: {} (check {}/{})",
            cluster, state, attempt, max_attempts
        ),
        ProgressEvent::Ready { cluster, .. } => {
            format!("\u{2713} Cluster {} is ready, creating database user", cluster)
        }
        ProgressEvent::UserCreated { username } => {
            format!("Database user {} created", username)
        }
        ProgressEvent::UserExists { username } => {
            format!("Database user {} already exists", username)
        }
    }
}
