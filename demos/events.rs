//! Event bus and expiry driver examples

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use unity_tools::{
    EventBus, EventListener, ListenerRegistration, ObjectPooler, PoolConfiguration, Prototype,
    SimpleObjectPooler, spawn_expiry_driver,
};

#[derive(Debug)]
struct EnemyKilled {
    points: u32,
}

#[derive(Default)]
struct Scoreboard {
    score: Mutex<u32>,
}

impl EventListener<EnemyKilled> for Scoreboard {
    fn on_event(&self, event: &EnemyKilled) {
        *self.score.lock() += event.points;
    }
}

#[tokio::main]
async fn main() {
    println!("=== UnityTools - Events ===\n");

    // Example 1: Listeners
    let bus = EventBus::new();
    let scoreboard = Arc::new(Scoreboard::default());
    ListenerRegistration::<EnemyKilled>::start_listening(&scoreboard, &bus);

    let logger: Arc<dyn EventListener<EnemyKilled>> =
        Arc::new(|event: &EnemyKilled| println!("   Enemy killed: {event:?}"));
    bus.subscribe(logger);

    bus.publish(EnemyKilled { points: 10 }).unwrap();
    bus.publish(EnemyKilled { points: 25 }).unwrap();
    println!("   Score: {}\n", scoreboard.score.lock());

    // Example 2: Expiry driven by a tokio task
    let config = PoolConfiguration::new()
        .with_capacity(2)
        .with_lifetime(Duration::from_millis(200));
    let mut pooler = SimpleObjectPooler::new("Explosions", config)
        .with_prototype(Prototype::new("Explosion", || 1.0f32));
    pooler.initialize();
    pooler.spawn().unwrap();

    let shared = Arc::new(Mutex::new(pooler));
    let driver = spawn_expiry_driver(Arc::clone(&shared), Duration::from_millis(16)).unwrap();

    println!("   Active now: {}", shared.lock().metrics().active_objects);
    tokio::time::sleep(Duration::from_millis(300)).await;
    println!("   Active after 300ms: {}", shared.lock().metrics().active_objects);

    driver.abort();
}
