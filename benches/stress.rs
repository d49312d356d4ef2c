use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Duration as Span, Utc, Weekday};
use ulid::Ulid;

use openslot::clock::SystemClock;
use openslot::engine::{Engine, InMemoryStore};
use openslot::model::Availability;
use openslot::repo::AvailabilityRepository;

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_latency(label: &str, latencies: &mut [Duration]) {
    latencies.sort();
    let total: Duration = latencies.iter().sum();
    let avg = total / latencies.len() as u32;
    println!("  {label}:");
    println!(
        "    n={}, avg={:.2}ms, p50={:.2}ms, p95={:.2}ms, p99={:.2}ms, max={:.2}ms",
        latencies.len(),
        avg.as_secs_f64() * 1000.0,
        percentile(latencies, 50.0).as_secs_f64() * 1000.0,
        percentile(latencies, 95.0).as_secs_f64() * 1000.0,
        percentile(latencies, 99.0).as_secs_f64() * 1000.0,
        latencies.last().unwrap().as_secs_f64() * 1000.0,
    );
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

async fn seed(store: &InMemoryStore, engine: &Engine, providers: usize) -> (Vec<Ulid>, Ulid) {
    let client = Ulid::new();
    engine.create_client(client).await.unwrap();

    let mut ids = Vec::with_capacity(providers);
    for _ in 0..providers {
        let id = Ulid::new();
        engine.create_provider(id).await.unwrap();
        for dow in WEEKDAYS {
            store
                .upsert_template(Availability {
                    id: Ulid::new(),
                    provider_id: id,
                    source: "bench".into(),
                    external_id: format!("{dow}-all-day"),
                    start_day_of_week: dow,
                    start_time: "00:00:00".parse().unwrap(),
                    end_day_of_week: dow,
                    end_time: "23:59:59".parse().unwrap(),
                })
                .await
                .unwrap();
        }
        ids.push(id);
    }
    println!("  created {} providers", ids.len());
    (ids, client)
}

#[tokio::main]
async fn main() {
    let store = Arc::new(InMemoryStore::new());
    let engine = Arc::new(Engine::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(SystemClock),
    ));
    let (providers, client) = seed(&store, &engine, 10).await;

    // ── Free-slot query latency ─────────────────────────
    let from = Utc::now() + Span::hours(1);
    let mut latencies = Vec::with_capacity(1000);
    for i in 0..1000 {
        let provider = providers[i % providers.len()];
        let range = engine
            .validate_range(Some(from), Some(from + Span::hours(24)))
            .unwrap();
        let start = Instant::now();
        let slots = engine.free_slots(provider, &range).await.unwrap();
        latencies.push(start.elapsed());
        assert!(!slots.is_empty());
    }
    print_latency("free_slots (24h window)", &mut latencies);

    // ── Contended bookings on a single provider ─────────
    let provider = providers[0];
    let started = Instant::now();
    let mut handles = Vec::new();
    for i in 0..200i64 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            let s = from + Span::minutes(i * 30);
            let start = Instant::now();
            let result = engine
                .book_appointment(Ulid::new(), client, provider, s, s + Span::minutes(30))
                .await;
            (start.elapsed(), result.is_ok())
        }));
    }

    let mut booked = 0;
    let mut latencies = Vec::with_capacity(handles.len());
    for handle in handles {
        let (latency, ok) = handle.await.unwrap();
        latencies.push(latency);
        if ok {
            booked += 1;
        }
    }
    println!(
        "  {booked}/200 bookings accepted in {:.2?}",
        started.elapsed()
    );
    print_latency("book_appointment (single provider)", &mut latencies);
}
