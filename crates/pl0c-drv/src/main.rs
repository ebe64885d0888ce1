use std::process::ExitCode;

fn main() -> ExitCode {
    pl0c_drv::run()
}
