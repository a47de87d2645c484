use std::process;

use nix::sys::signal::{SigSet, Signal, SigmaskHow, sigprocmask};

use minish::config::ConfigLoader;
use minish::repl;
use minish::session::Session;

/// Keyboard signals are blocked for the shell process itself; children
/// inherit the mask across exec unchanged.
fn block_signals() {
    let mut sigs = SigSet::empty();
    sigs.add(Signal::SIGINT);
    sigs.add(Signal::SIGQUIT);
    sigs.add(Signal::SIGTSTP);
    if let Err(e) = sigprocmask(SigmaskHow::SIG_BLOCK, Some(&sigs), None) {
        eprintln!("minish: sigprocmask: {}", e);
    }
}

fn main() {
    block_signals();

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("minish: {}", e);
            ConfigLoader::default_config()
        }
    };

    let mut session = Session::new(&config);
    process::exit(repl::start(&mut session));
}
