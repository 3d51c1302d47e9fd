use std::process::ExitCode;

fn main() -> ExitCode {
    shopping_insights_lib::run()
}
