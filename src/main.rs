use anyhow::Result;
use hcsv::{logging, Collection, CsvCache, NasVmcInfo, Settings};
use std::{env, path::PathBuf};
use tracing::{error, info};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init("info");
    info!("startup");

    // ─── 2) configure report dir ─────────────────────────────────────
    let mut settings = Settings::from_env();
    if let Some(dir) = env::args().nth(1) {
        settings.report_dir = PathBuf::from(dir);
    }
    let collection = Collection::from_settings(&settings);
    info!(
        dir = %collection.dir().display(),
        server = %settings.server,
        "reading collected csv files"
    );

    // ─── 3) discover collected files ─────────────────────────────────
    let files = collection.discover()?;
    if files.is_empty() {
        info!("no csv files collected; exit");
        return Ok(());
    }
    info!("{} csv files to load", files.len());

    // ─── 4) load every file through one shared cache ─────────────────
    // Sequential: every load takes the same cache-wide lock.
    let cache = CsvCache::new();
    let loaded = collection.load_all(&cache, &files);

    // ─── 5) typed sections ───────────────────────────────────────────
    match collection.records::<NasVmcInfo, _>(&cache) {
        Ok(Some(shares)) => {
            for share in &shares {
                info!(
                    proxy = %share.file_proxy,
                    share = %share.file_share_id,
                    size = %share.total_share_size,
                    "nas share"
                );
            }
            info!("{} nas shares", shares.len());
        }
        Ok(None) => info!("no nas data collected"),
        Err(e) => error!("nas section failed: {:#}", e),
    }

    info!(loaded, total = files.len(), "all done");
    Ok(())
}
