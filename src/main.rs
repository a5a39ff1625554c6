//! Binary entrypoint that launches the Direct Line proxy.

use std::process::ExitCode;

use directline_proxy::start_directline_proxy;

/// Start the proxy and relay chat traffic until interrupted.
fn main() -> ExitCode {
    start_directline_proxy::run()
}
