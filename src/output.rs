use owo_colors::OwoColorize;

use crate::prune::PruneSummary;
use crate::rename::RenameSummary;

/// User-facing messages, separate from tracing. Colors are enabled only when
/// the stream is a TTY.
fn is_tty(stream: atty::Stream) -> bool {
    atty::is(stream)
}

pub fn print_info(msg: &str) {
    if is_tty(atty::Stream::Stdout) {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty(atty::Stream::Stderr) {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty(atty::Stream::Stderr) {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty(atty::Stream::Stdout) {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

pub fn print_rename_summary(s: &RenameSummary) {
    print_success(&format!(
        "Renaming done: {} files seen, {} already placed, {} moved ({} companions), {} shard dirs created",
        s.primary_seen, s.already_placed, s.moved, s.companions_moved, s.dirs_created
    ));
    if s.log_write_failures > 0 {
        print_warn(&format!(
            "{} shard directories could not be written to the dir log",
            s.log_write_failures
        ));
    }
}

pub fn print_prune_summary(s: &PruneSummary) {
    print_success(&format!(
        "Deletion done: {} directories visited, {} removed",
        s.dirs_visited, s.dirs_removed
    ));
}
