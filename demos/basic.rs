//! Basic usage examples for SimpleObjectPooler

use std::time::Duration;
use unity_tools::{ObjectPooler, PoolConfiguration, Prototype, SimpleObjectPooler};

#[derive(Debug, Default)]
struct Bullet {
    x: f32,
    y: f32,
}

fn main() {
    println!("=== UnityTools - Basic Examples ===\n");

    // Example 1: Fixed pool
    fixed_pool();

    // Example 2: Expanding pool
    expanding_pool();

    // Example 3: Lifetimes
    lifetimes();

    // Example 4: Metrics and health
    metrics_and_health();
}

fn bullets(config: PoolConfiguration) -> SimpleObjectPooler<Bullet> {
    let mut pooler = SimpleObjectPooler::new("Bullets", config)
        .with_prototype(Prototype::new("Bullet", Bullet::default));
    pooler.initialize();
    pooler
}

fn fixed_pool() {
    println!("1. Fixed Pool:");
    let mut pooler = bullets(PoolConfiguration::new().with_capacity(2).with_expansion(false));

    let first = pooler.spawn().unwrap();
    let _second = pooler.spawn().unwrap();
    println!("   Third acquire: {:?}", pooler.acquire().map(|item| item.id()));

    pooler.release(first).unwrap();
    println!("   After release: {:?}\n", pooler.acquire().map(|item| item.id()));
}

fn expanding_pool() {
    println!("2. Expanding Pool:");
    let mut pooler = bullets(PoolConfiguration::new().with_capacity(1));

    for _ in 0..3 {
        let bullet = pooler.acquire().unwrap();
        bullet.activate();
        bullet.x += 1.0;
        println!("   Spawned {}", bullet.name());
    }
    println!("   Pool size: {}\n", pooler.pool().map_or(0, |pool| pool.len()));
}

fn lifetimes() {
    println!("3. Lifetimes:");
    let mut pooler = bullets(
        PoolConfiguration::new()
            .with_capacity(4)
            .with_lifetime(Duration::from_millis(300)),
    );

    pooler.spawn().unwrap();
    let frame = Duration::from_millis(100);
    for n in 1..=3 {
        let expired = pooler.tick(frame);
        println!("   Frame {n}: {expired} expired");
    }
    println!();
}

fn metrics_and_health() {
    println!("4. Metrics and Health:");
    let mut pooler = bullets(PoolConfiguration::new().with_capacity(5).with_expansion(false));

    for _ in 0..5 {
        let id = pooler.spawn().unwrap();
        if let Some(bullet) = pooler.item_mut(id) {
            bullet.y = 2.0;
        }
    }

    let health = pooler.health_status();
    println!("   Health: {}", if health.is_healthy { "Healthy" } else { "Unhealthy" });
    println!("   Utilization: {:.1}%", health.utilization * 100.0);
    for warning in &health.warnings {
        println!("   Warning: {warning}");
    }

    let metrics = pooler.export_metrics();
    println!("\n   Metrics:");
    for (key, value) in metrics {
        println!("     {}: {}", key, value);
    }
}
