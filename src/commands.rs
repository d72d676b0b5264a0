use anyhow::Result;

use pagesnap_core::config::AppConfig;
use pagesnap_core::cookie_store::CookieStore;

pub fn run_cache(config: AppConfig, domain: Option<String>) -> Result<()> {
    let store = CookieStore::load(&config.cookies.cache_file, true)?;

    match domain {
        Some(d) => match store.get(&d) {
            Some(records) => {
                println!("{} ({} cookies):", d, records.len());
                for r in records {
                    println!(
                        "  {} = {}  (path {}, secure {}, http_only {})",
                        r.name, r.value, r.path, r.secure, r.http_only
                    );
                }
            }
            None => println!("no cached cookies for {}", d),
        },
        None => {
            let mut domains = store.domains();
            domains.sort();
            if domains.is_empty() {
                println!("cookie cache is empty");
                return Ok(());
            }
            for d in domains {
                let count = store.get(&d).map(|r| r.len()).unwrap_or(0);
                println!("{}  ({} cookies)", d, count);
            }
        }
    }

    Ok(())
}
