// UnityTools demo binary
// The library lives in lib.rs; more examples under demos/
// Run examples with: cargo run --example basic

use std::time::Duration;
use tracing_subscriber::EnvFilter;
use unity_tools::{ObjectPooler, PoolConfiguration, Prototype, SimpleObjectPooler};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    println!("=== UnityTools ===");
    println!("Run: cargo run --example basic");
    println!();

    println!("Quick Demo:");
    let config = PoolConfiguration::new()
        .with_capacity(3)
        .with_lifetime(Duration::from_millis(500));
    let mut pooler = SimpleObjectPooler::new("Bullets", config)
        .with_prototype(Prototype::new("Bullet", || 0u32));
    pooler.initialize();

    match pooler.spawn() {
        Ok(id) => println!("  Spawned: {}", pooler.item(id).map_or("?", |item| item.name())),
        Err(e) => println!("  Spawn failed: {e}"),
    }

    pooler.tick(Duration::from_millis(500));
    println!("  Active after lifetime: {}", pooler.metrics().active_objects);

    pooler.teardown();
}
