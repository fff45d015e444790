//! One-shot environment diagnostic.
//!
//! Logs whether the service role key is set (redacted) and which related
//! variables exist. Always exits successfully.

use tg_core::diagnostics;

fn main() {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    diagnostics::inspect_process().log();
}
