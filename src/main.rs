//! sqlboot main entrypoint.

use sqlboot::run;

fn main() {
    if let Err(e) = run() {
        sqlboot::ui::messages::error(format!("{}", e));
        std::process::exit(1);
    }
}
