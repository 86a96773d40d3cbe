use std::sync::Arc;

use bookshelf_client::{BookshelfClient, Config, FileStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional: enable basic logging for the example
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // Load configuration from a JSON file placed next to the binary
    let cfg = Config::from_file("config.json")?;
    let store = Arc::new(FileStore::new("credentials.json"));
    let client = BookshelfClient::new(cfg, store)?;

    if !client.is_authenticated().await? {
        let username = std::env::var("BOOKSHELF_USERNAME")?;
        let password = std::env::var("BOOKSHELF_PASSWORD")?;
        client.login(&username, &password).await?;
    }

    for book in client.my_books().await? {
        println!("{} {} ({})", book.id, book.title, client.thumbnail_url(&book.id));
    }

    if let Some(path) = std::env::args().nth(1) {
        let bytes = std::fs::read(&path)?;
        let name = std::path::Path::new(&path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.pdf");
        let uploaded = client.upload(name, bytes).await?;
        println!("{}: {}", uploaded.message, uploaded.book_data.id);
    }
    Ok(())
}
