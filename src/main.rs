//! rMatlog main entrypoint.

use rmatlog::run;
use rmatlog::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
