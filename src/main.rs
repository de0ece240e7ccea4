//! fieldclock main entrypoint.

use fieldclock::run;
use fieldclock::ui::messages::info;

fn main() {
    if let Err(e) = run() {
        if e.is_silent() {
            info(e);
            return;
        }
        eprintln!("Error: {e}");
        if e.is_user_correctable() {
            eprintln!("Nothing was changed. Fix the input and try again.");
        }
        std::process::exit(1);
    }
}
