use anyhow::Result;
use fontbind::{cli, commands, debug};

fn main() -> Result<()> {
    // Parse CLI arguments first (before logging init for cleaner usage output)
    let runtime_options = cli::process_cli();

    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config (applied below).
    debug::init_log_bridge(runtime_options.log_level);
    log::info!("Starting fontbind {}", fontbind::VERSION);

    let result = commands::load_config(runtime_options.config_path.as_deref()).and_then(|config| {
        debug::apply_config(&config);
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        commands::run(&runtime_options.command, &config, &mut out)
    });

    if let Err(ref e) = result {
        eprintln!("fontbind: error: {e:#}");
    }
    // Return the error so main exits with code 1 (anyhow default)
    result
}
