//! Exemple d'utilisation basique de pmospotify
//!
//! Cet exemple montre comment :
//! - Créer un client depuis la session stockée dans la configuration
//! - Lister toutes les playlists de l'utilisateur
//! - Récupérer les tracks d'une playlist

use pmospotify::SpotifyClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialiser le logging
    tracing_subscriber::fmt::init();

    println!("=== PMOSpotify - Listing des playlists ===\n");

    // Créer un client depuis la configuration
    println!("Connexion à Spotify...");
    let client = SpotifyClient::from_config()?;

    let user = client.current_user().await?;
    println!("✓ Connecté en tant que {} ({})", user.display_name(), user.id);

    println!("\n--- Playlists ---");
    let playlists = client.fetch_playlists().await?;
    println!("✓ {} playlist(s)\n", playlists.len());

    for (i, playlist) in playlists.iter().enumerate() {
        println!(
            "  {}. {} ({} tracks)",
            i + 1,
            playlist.name,
            playlist.track_count
        );
    }

    // Récupérer les tracks de la première playlist
    if let Some(first) = playlists.first() {
        println!("\n--- Tracks de '{}' ---", first.name);
        let tracks = client.fetch_tracks(first).await?;

        for track in tracks.iter().take(10) {
            println!("  {} - {}", track.display_artist(), track.name);
        }
        if tracks.len() > 10 {
            println!("  ... et {} autres tracks", tracks.len() - 10);
        }
    }

    println!("\n✓ Exemple terminé avec succès !");

    Ok(())
}
