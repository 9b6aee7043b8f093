//! Exemple de contrôle de la lecture avec pmospotify
//!
//! Cet exemple montre comment :
//! - Lister les devices de lecture disponibles
//! - Transférer la lecture vers un device sans la démarrer
//! - Basculer lecture/pause
//! - Afficher la lecture en cours

use pmospotify::SpotifyClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialiser le logging
    tracing_subscriber::fmt::init();

    println!("=== PMOSpotify - Contrôle de la lecture ===\n");

    let client = SpotifyClient::from_config()?;

    println!("--- Devices disponibles ---");
    let devices = client.refresh_devices().await?;

    if devices.is_empty() {
        println!("⚠ Aucun device de lecture disponible.");
        println!("  Ouvrez Spotify sur un appareil et relancez l'exemple.");
        return Ok(());
    }

    for (i, device) in devices.iter().enumerate() {
        let marker = if device.is_active { " (actif)" } else { "" };
        println!(
            "  {}. {}{} [volume {}%]",
            i + 1,
            device.display_name,
            marker,
            device.volume_percent
        );
    }

    // Transférer la lecture vers le premier device, en respectant
    // l'intention de lecture courante (un transfert en pause reste en pause)
    let target = &devices[0];
    println!("\nTransfert de la lecture vers '{}'...", target.display_name);
    client.select_device(&target.id).await?;
    println!("✓ Transfert effectué");

    println!("\n--- Bascule lecture/pause ---");
    let state = client.toggle_playback().await?;
    println!("✓ Lecture maintenant: {:?}", state);

    println!("\n--- Lecture en cours ---");
    match client.currently_playing().await? {
        Some(now_playing) => {
            println!(
                "  {} - {} ({})",
                now_playing.artist,
                now_playing.name,
                if now_playing.is_playing {
                    "en lecture"
                } else {
                    "en pause"
                }
            );
        }
        None => println!("  Aucune lecture en cours."),
    }

    println!("\n✓ Exemple terminé avec succès !");

    Ok(())
}
