//! Outil CLI pour chiffrer/déchiffrer des secrets (tokens OAuth)
//!
//! Usage:
//!   cargo run --example encrypt_token -- encrypt "mon_token"
//!   cargo run --example encrypt_token -- decrypt "encrypted:ABC123..."

use anyhow::Result;
use pmoconfig::encryption::{decrypt_secret, encrypt_secret};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        print_usage();
        return Ok(());
    }

    match args[1].as_str() {
        "encrypt" => {
            let secret = &args[2];
            let encrypted = encrypt_secret(secret)?;

            println!("Original:  {}", secret);
            println!("Encrypted: {}", encrypted);
            println!("\nAdd this to your config.yaml:");
            println!("auth_token: \"{}\"", encrypted);
        }

        "decrypt" => {
            let encrypted = &args[2];
            let secret = decrypt_secret(encrypted)?;

            println!("Encrypted: {}", encrypted);
            println!("Decrypted: {}", secret);
        }

        _ => print_usage(),
    }

    Ok(())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  encrypt_token encrypt <secret>");
    eprintln!("  encrypt_token decrypt <encrypted:...>");
}
