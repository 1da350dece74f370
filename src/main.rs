//! resetit binary entry point.

use resetit::{cli, ui::output};

fn main() {
    if let Err(e) = cli::run() {
        output::error(e);
        std::process::exit(1);
    }
}
