use {
    anyhow::{Context, Result, bail},
    std::path::{Path, PathBuf},
    tryon::{Engine, EngineConfig, TryOnRequest},
};

fn media_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

fn read_payload(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(image::encode_payload(&bytes, media_type(path)))
}

#[tokio::main]
async fn main() -> Result<()> {
    base::init_stdout_logger();
    base::max_level_from_env("TRYON_LOG");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "Usage: {} <subject-image> <garment-image> <category> [out-dir]",
            args[0]
        );
        std::process::exit(1);
    }
    let subject = PathBuf::from(&args[1]);
    let garment = PathBuf::from(&args[2]);
    let category = &args[3];
    let out_dir = PathBuf::from(args.get(4).map(String::as_str).unwrap_or("."));
    let user_id = std::env::var("TRYON_USER").unwrap_or_else(|_| "local".to_string());

    let engine = Engine::builder(EngineConfig::from_env()).build()?;
    engine.initialize().await?;

    let request = TryOnRequest::new(
        read_payload(&subject)?,
        read_payload(&garment)?,
        category.as_str(),
        user_id.as_str(),
    );
    let result = match engine.try_on(request).await {
        Ok(result) => result,
        Err(err) => bail!("try-on failed ({}): {}", err.kind(), err),
    };

    std::fs::create_dir_all(&out_dir)?;
    let json_path = out_dir.join("result.json");
    std::fs::write(&json_path, serde_json::to_string_pretty(result.as_ref())?)?;

    let png = image::decode_payload(&result.result_image)?;
    let png_path = out_dir.join("composite.png");
    std::fs::write(&png_path, png)?;

    log::info!(
        "fit {:.2}, confidence {:.2}, {} ms",
        result.metadata.garment_fit_score,
        result.confidence,
        result.processing_time
    );
    for note in &result.metadata.recommendations {
        log::info!("  - {}", note);
    }
    let size = engine.recommend_size(&user_id, None);
    log::info!("suggested size {} ({:.2})", size.size, size.confidence);
    log::info!("wrote {} and {}", json_path.display(), png_path.display());
    Ok(())
}
