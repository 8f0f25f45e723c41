use indicatif::{ProgressBar, ProgressStyle};

/// One tick per page of app IDs.
pub fn single_pb() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let template = "[{elapsed_precise}] [ {bar:50} ] {pos}/{len} {msg} {spinner}";
    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        pb.set_style(style.progress_chars("#|-"));
    }
    pb.set_message("pages");
    pb
}
