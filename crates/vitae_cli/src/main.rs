//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `vitae_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use vitae_core::{EditingSession, ProfileDocument, TextField, MUTATION_SETTLE_MS};

fn main() {
    let mut session = EditingSession::new(ProfileDocument::new());

    let company = session.add_company();
    let outcome = session
        .add_project(company)
        .and_then(|project| session.set_text(project, TextField::Title, "Smoke project"));
    if let Err(err) = outcome {
        eprintln!("vitae_core smoke failed: {err}");
        std::process::exit(1);
    }
    session.advance(MUTATION_SETTLE_MS);

    let fields = session.submit();
    println!("vitae_core version={}", vitae_core::core_version());
    println!("vitae_core fields={}", fields.len());
    println!("vitae_core pool={}", session.pool().len());
}
