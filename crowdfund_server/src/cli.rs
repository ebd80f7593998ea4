use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // CF_JWT_SECRET and CF_MIDTRANS_SERVER_KEY are left out on purpose
    const DISPLAY_ENVS: [&str; 9] = [
        "RUST_LOG",
        "CF_HOST",
        "CF_PORT",
        "CF_DATABASE_URL",
        "CF_GATEWAY_TIMEOUT_SECS",
        "CF_UNPAID_TRANSACTION_TIMEOUT",
        "CF_VERIFY_NOTIFICATION_SIGNATURE",
        "CF_MIDTRANS_BASE_URL",
        "CF_MIDTRANS_CLIENT_KEY",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
