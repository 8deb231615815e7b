use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a request is in flight. Draws to stderr and stays hidden when stderr is not a terminal.
pub fn request_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner} {msg} [{elapsed}]")
            .expect("invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Remove the spinner so the report line can take its place.
pub fn clear_spinner(pb: &ProgressBar) {
    pb.finish_and_clear();
}
